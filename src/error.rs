//! Error types and helpers for user-friendly error messages
//!
//! Every failure in the launcher is a [`LaunchError`] value that travels back
//! to `main`, which is the only place that decides the process exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{BuildMode, Compiler};

/// Quote a list of tokens the way they are reported to the user: `'a', 'b'`
fn quoted(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("'{}'", t))
        .collect::<Vec<_>>()
        .join(", ")
}

fn unknown_arguments_message(tokens: &[String]) -> String {
    if tokens.len() == 1 {
        format!("Unknown argument ({})", quoted(tokens))
    } else {
        format!("Unknown arguments ({})", quoted(tokens))
    }
}

/// Errors produced while resolving, building or running
#[derive(Error, Debug)]
pub enum LaunchError {
    /// One or more tokens matched neither a mode nor a compiler flag
    #[error("{}", unknown_arguments_message(.tokens))]
    UnknownArguments { tokens: Vec<String> },

    /// More than one build mode was supplied
    #[error("Too many 'mode' arguments, please pick only one ({})", quoted(.tokens))]
    TooManyModes { tokens: Vec<String> },

    /// More than one compiler was supplied
    #[error("Too many 'compiler' arguments, please pick only one ({})", quoted(.tokens))]
    TooManyCompilers { tokens: Vec<String> },

    /// No ancestor directory carries the project name
    #[error("Couldn't find '{name}' root directory in the local file structure")]
    RootNotFound { name: String, start: PathBuf },

    /// The project root is missing a required file or directory
    #[error("Invalid project structure: {message}")]
    ProjectStructure {
        message: String,
        expected: Vec<String>,
        hint: String,
    },

    /// The selected profile has no command template
    #[error("No build command configured for {compiler} {mode}")]
    EmptyTemplate { compiler: Compiler, mode: BuildMode },

    /// The command template could not be expanded
    #[error("Invalid command template '{template}': {message}")]
    Template { template: String, message: String },

    /// The override file could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// The compiler program is not on PATH
    #[error("Missing tool: {tool}")]
    MissingTool { tool: String, hint: String },

    /// The compiler exited unsuccessfully
    #[error("Build failed (exit code {exit_code})\n{stderr}")]
    BuildFailure { exit_code: i32, stderr: String },

    /// The produced executable exited unsuccessfully
    #[error("Run failed (exit code {exit_code})\n{stderr}")]
    RunFailure { exit_code: i32, stderr: String },

    /// Filesystem operation failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Anything else raised while attempting the build
    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl LaunchError {
    /// Create a filesystem error with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a project structure error
    pub fn project_structure_error(
        message: impl Into<String>,
        expected: Vec<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::ProjectStructure {
            message: message.into(),
            expected,
            hint: hint.into(),
        }
    }

    /// Create a template error
    pub fn template_error(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Hint shown below the error, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            LaunchError::UnknownArguments { .. }
            | LaunchError::TooManyModes { .. }
            | LaunchError::TooManyCompilers { .. } => Some(hints::selectors()),
            LaunchError::RootNotFound { name, start } => Some(hints::root_not_found(name, start)),
            LaunchError::EmptyTemplate { compiler, mode } => {
                Some(hints::empty_template(*compiler, *mode))
            }
            LaunchError::ProjectStructure { hint, .. } | LaunchError::MissingTool { hint, .. } => {
                Some(hint.clone())
            }
            _ => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!(
            "{} {}",
            style(format!("{} [ERROR]:", crate::utils::terminal::LOG_PREFIX))
                .red()
                .bold(),
            self
        );

        if let Some(h) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
        }

        if let LaunchError::ProjectStructure { expected, .. } = self {
            if !expected.is_empty() {
                eprintln!("\n{}", style("EXPECTED:").cyan().bold());
                for exp in expected {
                    eprintln!("  • {}", exp);
                }
            }
        }
    }
}

/// Common error hints
pub mod hints {
    use std::path::Path;

    use crate::config::{BuildMode, Compiler, OVERRIDE_FILE};

    pub fn selectors() -> String {
        format!(
            "Pick at most one mode ({}) and at most one compiler ({}).",
            BuildMode::ALL
                .iter()
                .map(|m| m.flag())
                .collect::<Vec<_>>()
                .join(", "),
            Compiler::ALL
                .iter()
                .map(|c| c.flag())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    pub fn root_not_found(name: &str, start: &Path) -> String {
        format!(
            "Searched upward from {}.\n\
             Run the launcher from inside the '{}' tree (or cd into it) or pass --start-dir <DIR>.",
            start.display(),
            name
        )
    }

    pub fn empty_template(compiler: Compiler, mode: BuildMode) -> String {
        format!(
            "Add a command to {} in the project root:\n\
             \n\
             [compilers.{}.{}]\n\
             cmd = \"<program> {{options}} {{src}} -I{{inc}} -I{{data}} {{lib}} -o {{exc}}\"\n\
             options = \"...\"",
            OVERRIDE_FILE,
            compiler.key(),
            mode.key()
        )
    }

    pub fn missing_compiler(program: &str) -> String {
        format!(
            "'{}' was not found on PATH. Install it or select another compiler\n\
             (e.g. -gcc or -clang).",
            program
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unknown_argument_singular() {
        let err = LaunchError::UnknownArguments {
            tokens: strings(&["-fast"]),
        };
        assert_eq!(err.to_string(), "Unknown argument ('-fast')");
    }

    #[test]
    fn test_unknown_arguments_plural() {
        let err = LaunchError::UnknownArguments {
            tokens: strings(&["-fast", "foo"]),
        };
        assert_eq!(err.to_string(), "Unknown arguments ('-fast', 'foo')");
    }

    #[test]
    fn test_too_many_modes_lists_all() {
        let err = LaunchError::TooManyModes {
            tokens: strings(&["-debug", "-release"]),
        };
        assert_eq!(
            err.to_string(),
            "Too many 'mode' arguments, please pick only one ('-debug', '-release')"
        );
    }

    #[test]
    fn test_root_not_found_message() {
        let err = LaunchError::RootNotFound {
            name: "TerraCraft".to_string(),
            start: PathBuf::from("/tmp"),
        };
        assert_eq!(
            err.to_string(),
            "Couldn't find 'TerraCraft' root directory in the local file structure"
        );
        assert!(err.hint().unwrap().contains("--start-dir"));
    }

    #[test]
    fn test_empty_template_hint_names_table() {
        let err = LaunchError::EmptyTemplate {
            compiler: Compiler::Icpx,
            mode: BuildMode::Release,
        };
        assert!(err.hint().unwrap().contains("[compilers.icpx.release]"));
    }

    #[test]
    fn test_build_failure_carries_stderr() {
        let err = LaunchError::BuildFailure {
            exit_code: 1,
            stderr: "main.c:1: error: expected ';'".to_string(),
        };
        assert!(err.to_string().contains("expected ';'"));
    }
}
