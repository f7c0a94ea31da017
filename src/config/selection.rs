//! Resolving command-line selectors into a single (compiler, mode) pair

use super::profiles::{BuildMode, Compiler};
use crate::error::LaunchError;

/// The compiler and build mode chosen for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub compiler: Compiler,
    pub mode: BuildMode,
}

impl Selection {
    /// Classify every token as a mode flag, a compiler flag, or unknown.
    ///
    /// Unknown tokens are reported together before anything else. At most
    /// one mode and one compiler may be supplied; repeating the same flag
    /// counts as two. Missing categories fall back to `-debug` and `-gcc`.
    pub fn resolve<I, S>(tokens: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unknown = Vec::new();
        let mut modes: Vec<(BuildMode, String)> = Vec::new();
        let mut compilers: Vec<(Compiler, String)> = Vec::new();

        for token in tokens {
            let token = token.as_ref();
            if let Some(mode) = BuildMode::from_flag(token) {
                modes.push((mode, token.to_string()));
            } else if let Some(compiler) = Compiler::from_flag(token) {
                compilers.push((compiler, token.to_string()));
            } else {
                unknown.push(token.to_string());
            }
        }

        if !unknown.is_empty() {
            return Err(LaunchError::UnknownArguments { tokens: unknown });
        }

        if modes.len() > 1 {
            return Err(LaunchError::TooManyModes {
                tokens: modes.into_iter().map(|(_, t)| t).collect(),
            });
        }

        if compilers.len() > 1 {
            return Err(LaunchError::TooManyCompilers {
                tokens: compilers.into_iter().map(|(_, t)| t).collect(),
            });
        }

        Ok(Self {
            compiler: compilers.pop().map(|(c, _)| c).unwrap_or_default(),
            mode: modes.pop().map(|(m, _)| m).unwrap_or_default(),
        })
    }
}
