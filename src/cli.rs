//! CLI argument parsing using clap derive macros
//!
//! Selectors such as `-release` or `-gcc` look like short flags but are not
//! clap arguments. [`Cli::try_parse_launcher`] moves every token that is not
//! one of the launcher's own options behind `--` before handing argv to clap,
//! so options and selectors can appear in any order.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::{Arg, CommandFactory, Parser};

use crate::build::{BuildContext, BuildOptions, BuildOutcome};
use crate::config::{ProfileTable, Selection, PROJECT_NAME};
use crate::error::LaunchError;
use crate::utils::paths::{find_project_root_default, find_project_root_from};
use crate::utils::terminal::{is_interactive, pause, print_detail, print_step};

/// TerraCraft build launcher
///
/// Compiles the game with the selected compiler and mode, then runs it.
#[derive(Parser, Debug)]
#[command(name = "tcbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build mode (-debug, -release) and compiler (-gcc, -clang, -mvsc, -icpx)
    #[arg(value_name = "SELECTORS")]
    pub selectors: Vec<String>,

    /// Directory to start searching upward for the project root
    /// [default: directory of the launcher executable, then the current directory]
    #[arg(long, value_name = "DIR", env = "TCBUILD_START_DIR")]
    pub start_dir: Option<PathBuf>,

    /// Print the build command without cleaning or compiling
    #[arg(long)]
    pub dry_run: bool,

    /// Do not wait for enter before exiting
    #[arg(long)]
    pub no_pause: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Whether `token` names one of the launcher's options; `Some(true)` when
/// the next token is its value
fn launcher_option(cmd: &clap::Command, token: &OsStr) -> Option<bool> {
    let takes_value = |arg: &Arg| arg.get_action().takes_values();
    let text = token.to_str()?;

    if let Some(long) = text.strip_prefix("--") {
        let (name, inline_value) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        if name == "help" || name == "version" {
            return Some(false);
        }
        return cmd
            .get_arguments()
            .find(|arg| arg.get_long() == Some(name))
            .map(|arg| takes_value(arg) && !inline_value);
    }

    let short = text.strip_prefix('-')?;
    let mut chars = short.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    if c == 'h' || c == 'V' {
        return Some(false);
    }
    cmd.get_arguments()
        .find(|arg| arg.get_short() == Some(c))
        .map(takes_value)
}

/// Reorder argv as `<bin> <options...> -- <selectors...>`
fn split_launcher_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let mut args = args.into_iter().map(Into::into);
    let mut options: Vec<OsString> = args.next().into_iter().collect();
    let mut selectors = Vec::new();

    while let Some(token) = args.next() {
        match launcher_option(&cmd, &token) {
            Some(takes_value) => {
                options.push(token);
                if takes_value {
                    options.extend(args.next());
                }
            }
            None => selectors.push(token),
        }
    }

    options.push(OsString::from("--"));
    options.extend(selectors);
    options
}

impl Cli {
    /// Parse the process arguments, exiting with clap's message on error
    pub fn parse_launcher() -> Self {
        Self::try_parse_launcher(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args` with launcher options recognized in any position
    pub fn try_parse_launcher<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(split_launcher_args(args))
    }

    /// Resolve the selection, build, run the game and relay its output
    pub fn execute(self) -> Result<(), LaunchError> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        print_step("Attempting build . . .");
        let selection = Selection::resolve(&self.selectors)?;

        let project_root = match &self.start_dir {
            Some(dir) => {
                let start = dir.canonicalize().map_err(|e| {
                    LaunchError::io(format!("Failed to resolve start directory {}", dir.display()), e)
                })?;
                find_project_root_from(&start, PROJECT_NAME)?
            }
            None => find_project_root_default(PROJECT_NAME)?,
        };
        if self.verbose {
            print_detail(&format!("Found '{}' at {}", PROJECT_NAME, project_root.display()));
        }
        let profiles = ProfileTable::load(&project_root)?;

        let options = BuildOptions {
            selection,
            dry_run: self.dry_run,
            spinner: !self.verbose && is_interactive(),
            verbose: self.verbose,
        };

        match BuildContext::new(project_root, profiles, options).run()? {
            BuildOutcome::Ran { stdout } => {
                println!("{}", stdout);
                if !self.no_pause && is_interactive() {
                    pause("Press enter to exit . . . ");
                }
            }
            BuildOutcome::DryRun { command } => {
                print_step("Dry run, nothing was cleaned or compiled");
                println!("{}", command);
            }
        }

        Ok(())
    }
}
