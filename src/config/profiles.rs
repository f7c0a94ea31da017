//! Compiler profiles
//!
//! Each compiler has one command template and one options string per build
//! mode. The built-in table below is the starting point; a project may
//! override individual entries through `build.toml` in its root:
//!
//! ```toml
//! [compilers.icpx.release]
//! cmd = "icx {options} {src} -I{inc} -I{data} {lib} -o {exc}"
//! options = "-std=c99 -O3"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LaunchError;

/// File name of the optional per-project override table
pub const OVERRIDE_FILE: &str = "build.toml";

/// Template shared by the GNU-style drivers
const GNU_CMD: &str = "gcc {options} {src} -I{inc} -I{data} {lib} -o {exc}";
const CLANG_CMD: &str = "clang {options} {src} -I{inc} -I{data} {lib} -o {exc}";

/// Built-in (cmd, options) pairs, indexed by `[Compiler::index()][BuildMode::index()]`
const BUILTIN: [[(&str, &str); BuildMode::COUNT]; Compiler::COUNT] = [
    // GNU GCC
    [
        (GNU_CMD, "-std=c99 -v -g -Wall -Wextra"),
        (GNU_CMD, "-std=c99 -Ofast"),
    ],
    // Clang / LLVM
    [
        (CLANG_CMD, "-std=c99 -g -Wall -Wextra"),
        (CLANG_CMD, "-std=c99 -O3"),
    ],
    // Microsoft Visual Studio
    [("", ""), ("", "")],
    // Intel oneAPI
    [("", ""), ("", "")],
];

/// Build mode selected with `-debug` or `-release`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    pub const COUNT: usize = 2;
    pub const ALL: [BuildMode; Self::COUNT] = [BuildMode::Debug, BuildMode::Release];

    /// Command-line flag for this mode
    pub fn flag(self) -> &'static str {
        match self {
            BuildMode::Debug => "-debug",
            BuildMode::Release => "-release",
        }
    }

    /// Key used in the override file
    pub fn key(self) -> &'static str {
        &self.flag()[1..]
    }

    pub fn from_flag(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.flag() == token)
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Compiler selected with `-gcc`, `-clang`, `-mvsc` or `-icpx`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compiler {
    /// GNU Compiler Collection
    #[default]
    Gcc,
    /// LLVM Clang
    Clang,
    /// Microsoft Visual C++
    Mvsc,
    /// Intel oneAPI DPC++/C++
    Icpx,
}

impl Compiler {
    pub const COUNT: usize = 4;
    pub const ALL: [Compiler; Self::COUNT] = [
        Compiler::Gcc,
        Compiler::Clang,
        Compiler::Mvsc,
        Compiler::Icpx,
    ];

    /// Command-line flag for this compiler
    pub fn flag(self) -> &'static str {
        match self {
            Compiler::Gcc => "-gcc",
            Compiler::Clang => "-clang",
            Compiler::Mvsc => "-mvsc",
            Compiler::Icpx => "-icpx",
        }
    }

    /// Key used in the override file
    pub fn key(self) -> &'static str {
        &self.flag()[1..]
    }

    pub fn from_flag(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.flag() == token)
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Command template and options for one (compiler, mode) pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilerProfile {
    /// Command template with `{options}`, `{src}`, `{inc}`, `{data}`, `{exc}`, `{lib}`
    pub cmd: String,
    /// Value substituted for `{options}`
    pub options: String,
}

impl CompilerProfile {
    fn new(cmd: &str, options: &str) -> Self {
        Self {
            cmd: cmd.to_string(),
            options: options.to_string(),
        }
    }

    /// Whether this profile has anything to run
    pub fn is_empty(&self) -> bool {
        self.cmd.trim().is_empty()
    }
}

/// One entry of the override file; each field replaces only itself
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileOverride {
    cmd: Option<String>,
    options: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OverrideFile {
    #[serde(default)]
    compilers: HashMap<String, HashMap<String, ProfileOverride>>,
}

/// Full lookup table of compiler profiles
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: [[CompilerProfile; BuildMode::COUNT]; Compiler::COUNT],
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileTable {
    /// The table compiled into the launcher
    pub fn builtin() -> Self {
        let profiles = BUILTIN.map(|modes| modes.map(|(cmd, options)| CompilerProfile::new(cmd, options)));
        Self { profiles }
    }

    /// Built-in table merged with `<root>/build.toml`, if present
    pub fn load(project_root: &Path) -> Result<Self, LaunchError> {
        let path = project_root.join(OVERRIDE_FILE);
        let mut table = Self::builtin();
        if path.is_file() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| LaunchError::io(format!("Failed to read {}", path.display()), e))?;
            table.apply_overrides(&path, &content)?;
        }
        Ok(table)
    }

    /// Parse override TOML and apply it on top of this table
    pub fn apply_overrides(&mut self, path: &Path, content: &str) -> Result<(), LaunchError> {
        let config_error = |message: String| LaunchError::Config {
            path: PathBuf::from(path),
            message,
        };

        let file: OverrideFile =
            toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

        for (compiler_key, modes) in file.compilers {
            let compiler = Compiler::from_key(&compiler_key)
                .ok_or_else(|| config_error(format!("unknown compiler '{}'", compiler_key)))?;
            for (mode_key, entry) in modes {
                let mode = BuildMode::from_key(&mode_key).ok_or_else(|| {
                    config_error(format!(
                        "unknown build mode '{}' for compiler '{}'",
                        mode_key, compiler_key
                    ))
                })?;
                let profile = &mut self.profiles[compiler.index()][mode.index()];
                if let Some(cmd) = entry.cmd {
                    profile.cmd = cmd;
                }
                if let Some(options) = entry.options {
                    profile.options = options;
                }
            }
        }

        Ok(())
    }

    /// Look up the profile for a pair
    pub fn get(&self, compiler: Compiler, mode: BuildMode) -> &CompilerProfile {
        &self.profiles[compiler.index()][mode.index()]
    }

    /// Look up the profile for a pair, failing if it has no command
    pub fn require(&self, compiler: Compiler, mode: BuildMode) -> Result<&CompilerProfile, LaunchError> {
        let profile = self.get(compiler, mode);
        if profile.is_empty() {
            return Err(LaunchError::EmptyTemplate { compiler, mode });
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_round_trip_through_lookup() {
        for compiler in Compiler::ALL {
            assert_eq!(Compiler::from_flag(compiler.flag()), Some(compiler));
        }
        for mode in BuildMode::ALL {
            assert_eq!(BuildMode::from_flag(mode.flag()), Some(mode));
        }
        assert_eq!(Compiler::from_flag("gcc"), None);
        assert_eq!(BuildMode::from_flag("-Debug"), None);
    }

    #[test]
    fn test_builtin_gcc_profiles() {
        let table = ProfileTable::builtin();
        let debug = table.get(Compiler::Gcc, BuildMode::Debug);
        assert_eq!(debug.cmd, "gcc {options} {src} -I{inc} -I{data} {lib} -o {exc}");
        assert_eq!(debug.options, "-std=c99 -v -g -Wall -Wextra");

        let release = table.get(Compiler::Gcc, BuildMode::Release);
        assert_eq!(release.options, "-std=c99 -Ofast");
    }

    #[test]
    fn test_unconfigured_compilers_are_rejected() {
        let table = ProfileTable::builtin();
        for compiler in [Compiler::Mvsc, Compiler::Icpx] {
            for mode in BuildMode::ALL {
                let err = table.require(compiler, mode).unwrap_err();
                assert!(matches!(
                    err,
                    LaunchError::EmptyTemplate { compiler: c, mode: m } if c == compiler && m == mode
                ));
            }
        }
        assert!(table.require(Compiler::Clang, BuildMode::Release).is_ok());
    }

    #[test]
    fn test_override_replaces_only_named_fields() {
        let mut table = ProfileTable::builtin();
        table
            .apply_overrides(
                Path::new("build.toml"),
                r#"
[compilers.gcc.release]
options = "-std=c99 -O2"

[compilers.icpx.debug]
cmd = "icx {options} {src} -o {exc}"
options = "-g"
"#,
            )
            .unwrap();

        let gcc = table.get(Compiler::Gcc, BuildMode::Release);
        assert_eq!(gcc.cmd, GNU_CMD);
        assert_eq!(gcc.options, "-std=c99 -O2");

        let icpx = table.require(Compiler::Icpx, BuildMode::Debug).unwrap();
        assert_eq!(icpx.cmd, "icx {options} {src} -o {exc}");
        assert!(table.require(Compiler::Icpx, BuildMode::Release).is_err());
    }

    #[test]
    fn test_override_unknown_compiler() {
        let mut table = ProfileTable::builtin();
        let err = table
            .apply_overrides(Path::new("build.toml"), "[compilers.tcc.debug]\ncmd = \"tcc\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("unknown compiler 'tcc'"));
    }

    #[test]
    fn test_override_unknown_field() {
        let mut table = ProfileTable::builtin();
        let err = table
            .apply_overrides(Path::new("build.toml"), "[compilers.gcc.debug]\nflags = \"-O1\"\n")
            .unwrap_err();
        assert!(matches!(err, LaunchError::Config { .. }));
    }

    #[test]
    fn test_override_syntax_error_has_location() {
        let mut table = ProfileTable::builtin();
        let err = table
            .apply_overrides(Path::new("build.toml"), "[compilers.gcc.debug]\ncmd = gcc\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_load_without_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let table = ProfileTable::load(dir.path()).unwrap();
        assert_eq!(
            table.get(Compiler::Gcc, BuildMode::Debug),
            ProfileTable::builtin().get(Compiler::Gcc, BuildMode::Debug)
        );
    }

    #[test]
    fn test_load_reads_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(OVERRIDE_FILE),
            "[compilers.mvsc.release]\ncmd = \"cl {options} {src} /Fe{exc}\"\n",
        )
        .unwrap();
        let table = ProfileTable::load(dir.path()).unwrap();
        assert!(table.require(Compiler::Mvsc, BuildMode::Release).is_ok());
    }
}
