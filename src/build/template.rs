//! Command template expansion
//!
//! Templates use `{name}` placeholders (`{{` and `}}` for literal braces).
//! A template can be expanded two ways:
//!
//! - [`CommandTemplate::render`] gives the literal command line, used for
//!   display and dry runs.
//! - [`CommandTemplate::argv`] gives the argument vector that is actually
//!   executed. No shell is involved, so source paths containing spaces or
//!   shell metacharacters reach the compiler unchanged.

use super::BuildRequest;
use crate::error::LaunchError;

/// Placeholders understood by the launcher
pub const PLACEHOLDERS: [&str; 6] = ["options", "src", "inc", "data", "exc", "lib"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Values substituted into a template, one list of words per placeholder
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    pub options: Vec<String>,
    pub src: Vec<String>,
    pub inc: String,
    pub data: String,
    pub exc: String,
    pub lib: Vec<String>,
}

impl Substitutions {
    /// Collect placeholder values for a build request
    pub fn for_request(request: &BuildRequest, options: &str) -> Self {
        Self {
            options: options.split_whitespace().map(str::to_string).collect(),
            src: request
                .sources
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            inc: request.include_dir.display().to_string(),
            data: request.data_dir.display().to_string(),
            exc: request.executable.display().to_string(),
            lib: request.libraries.clone(),
        }
    }

    fn words(&self, name: &str) -> Option<Vec<String>> {
        match name {
            "options" => Some(self.options.clone()),
            "src" => Some(self.src.clone()),
            "inc" => Some(vec![self.inc.clone()]),
            "data" => Some(vec![self.data.clone()]),
            "exc" => Some(vec![self.exc.clone()]),
            "lib" => Some(self.lib.clone()),
            _ => None,
        }
    }

    fn text(&self, name: &str) -> Option<String> {
        self.words(name).map(|w| w.join(" "))
    }
}

/// A parsed command template
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    source: String,
}

impl CommandTemplate {
    /// Parse and validate a template string
    pub fn parse(source: &str) -> Result<Self, LaunchError> {
        let template = Self {
            source: source.to_string(),
        };
        let tokens = template.source.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            return Err(LaunchError::template_error(source, "template is empty"));
        }
        for token in tokens {
            for segment in template.segments(token)? {
                if let Segment::Placeholder(name) = segment {
                    if !PLACEHOLDERS.contains(&name.as_str()) {
                        return Err(LaunchError::template_error(
                            source,
                            format!("unknown placeholder '{{{}}}'", name),
                        ));
                    }
                }
            }
        }
        Ok(template)
    }

    /// Literal command line with every placeholder replaced by its text
    pub fn render(&self, subs: &Substitutions) -> Result<String, LaunchError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in self.segments(&self.source)? {
            match segment {
                Segment::Literal(text) => out.push_str(&text),
                Segment::Placeholder(name) => out.push_str(&self.lookup_text(subs, &name)?),
            }
        }
        Ok(out)
    }

    /// Argument vector; the first element is the program
    pub fn argv(&self, subs: &Substitutions) -> Result<Vec<String>, LaunchError> {
        let mut args = Vec::new();
        for token in self.source.split_whitespace() {
            let segments = self.segments(token)?;
            if let [Segment::Placeholder(name)] = segments.as_slice() {
                let words = subs.words(name).ok_or_else(|| self.unknown(name))?;
                args.extend(words.into_iter().filter(|w| !w.is_empty()));
                continue;
            }

            let mut arg = String::new();
            for segment in segments {
                match segment {
                    Segment::Literal(text) => arg.push_str(&text),
                    Segment::Placeholder(name) => arg.push_str(&self.lookup_text(subs, &name)?),
                }
            }
            args.push(arg);
        }

        if args.is_empty() {
            return Err(LaunchError::template_error(
                &self.source,
                "template expands to an empty command",
            ));
        }
        Ok(args)
    }

    fn lookup_text(&self, subs: &Substitutions, name: &str) -> Result<String, LaunchError> {
        subs.text(name).ok_or_else(|| self.unknown(name))
    }

    fn unknown(&self, name: &str) -> LaunchError {
        LaunchError::template_error(&self.source, format!("unknown placeholder '{{{}}}'", name))
    }

    /// Split text into literal runs and placeholder names
    fn segments(&self, text: &str) -> Result<Vec<Segment>, LaunchError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) if ch == '{' || ch.is_whitespace() => {
                                return Err(LaunchError::template_error(
                                    &self.source,
                                    "unterminated placeholder",
                                ))
                            }
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(LaunchError::template_error(
                                    &self.source,
                                    "unterminated placeholder",
                                ))
                            }
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(LaunchError::template_error(&self.source, "unmatched '}'"));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }
}
