//! Build orchestration
//!
//! ```text
//! Selection → ProfileTable → CommandTemplate → compiler → bin/TerraCraft
//! ```
//!
//! - `template` - placeholder expansion into a command line and an argv

pub mod template;

use std::path::{Path, PathBuf};

use crate::config::{ProfileTable, Selection, PROJECT_NAME};
use crate::error::{hints, LaunchError};
use crate::exec::{find_program, run_captured};
use crate::utils::paths::{self, BINARY_DIR, DATA_DIR, INCLUDE_DIR};
use crate::utils::terminal::{create_spinner, print_detail, print_step, print_warning, separator};

use template::{CommandTemplate, Substitutions};

/// Options controlling one launcher invocation
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Compiler and build mode
    pub selection: Selection,
    /// Print the command without cleaning or spawning anything
    pub dry_run: bool,
    /// Show a spinner while the compiler runs
    pub spinner: bool,
    /// Verbose output
    pub verbose: bool,
}

/// Inputs for one compiler invocation, relative to the project root
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub project_root: PathBuf,
    /// Entry point first, then `data/src` files in name order
    pub sources: Vec<PathBuf>,
    pub include_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Output executable
    pub executable: PathBuf,
    /// Libraries to link; nothing populates this yet
    pub libraries: Vec<String>,
}

impl BuildRequest {
    /// Gather sources and fixed paths for the project at `project_root`
    pub fn discover(project_root: &Path) -> Result<Self, LaunchError> {
        let mut sources = vec![paths::require_entry_point(project_root)?];
        sources.extend(paths::list_sources(project_root)?);

        Ok(Self {
            project_root: project_root.to_path_buf(),
            sources,
            include_dir: PathBuf::from(INCLUDE_DIR),
            data_dir: PathBuf::from(DATA_DIR),
            executable: Self::executable_name(),
            libraries: Vec::new(),
        })
    }

    /// `bin/TerraCraft` with the host executable suffix
    pub fn executable_name() -> PathBuf {
        Path::new(BINARY_DIR).join(format!("{}{}", PROJECT_NAME, std::env::consts::EXE_SUFFIX))
    }

    /// Absolute path of the produced executable
    pub fn executable_path(&self) -> PathBuf {
        self.project_root.join(&self.executable)
    }
}

/// What a successful invocation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The command was only printed
    DryRun { command: String },
    /// The game was built and ran to completion
    Ran { stdout: String },
}

/// Project root, profile table and options for one invocation
#[derive(Debug)]
pub struct BuildContext {
    pub project_root: PathBuf,
    pub profiles: ProfileTable,
    pub options: BuildOptions,
}

impl BuildContext {
    pub fn new(project_root: PathBuf, profiles: ProfileTable, options: BuildOptions) -> Self {
        Self {
            project_root,
            profiles,
            options,
        }
    }

    /// Clean, compile, then run the game.
    ///
    /// Any failure stops the pipeline; the game never runs after a failed
    /// compile.
    pub fn run(&self) -> Result<BuildOutcome, LaunchError> {
        let Selection { compiler, mode } = self.options.selection;
        let profile = self.profiles.require(compiler, mode)?;
        let template = CommandTemplate::parse(&profile.cmd)?;

        if self.options.verbose {
            print_detail(&format!("Project root: {}", self.project_root.display()));
            print_detail(&format!("Profile: {} {}", compiler, mode));
        }

        if !self.options.dry_run {
            self.clean_binary_dir()?;
        }

        print_step("Constructing build command . . .");
        let request = BuildRequest::discover(&self.project_root)?;
        let subs = Substitutions::for_request(&request, &profile.options);
        let command = template.render(&subs)?;
        let argv = template.argv(&subs)?;
        print_step(&command);

        if self.options.dry_run {
            return Ok(BuildOutcome::DryRun { command });
        }

        self.compile(&argv)?;
        print_step(&format!("Build successful! Running game . . .\n{}", separator()));

        let stdout = self.run_game(&request)?;
        Ok(BuildOutcome::Ran { stdout })
    }

    fn clean_binary_dir(&self) -> Result<(), LaunchError> {
        let bin_dir = self.project_root.join(BINARY_DIR);
        if bin_dir.exists() {
            print_step("Cleaning binary directory . . .");
        } else {
            print_step("Binary directory was not found. Creating new one . . .");
        }

        let report = paths::prepare_binary_dir(&bin_dir)?;
        if self.options.verbose {
            if report.created {
                print_detail(&format!("Created {}", bin_dir.display()));
            }
            for path in &report.removed {
                print_detail(&format!("Removed {}", path.display()));
            }
        }
        for dir in &report.skipped_dirs {
            print_warning(&format!("Left subdirectory in place: {}", dir.display()));
        }
        Ok(())
    }

    fn compile(&self, argv: &[String]) -> Result<(), LaunchError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| LaunchError::template_error("", "template expands to an empty command"))?;

        let program_path = find_program(program, &self.project_root).ok_or_else(|| {
            LaunchError::MissingTool {
                tool: program.clone(),
                hint: hints::missing_compiler(program),
            }
        })?;

        let spinner = self
            .options
            .spinner
            .then(|| create_spinner(&format!("Compiling with {} . . .", program)));
        let result = run_captured(&program_path, args, &self.project_root);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let result = result?;

        if self.options.verbose {
            print_detail(&format!(
                "{} exited with {} after {:.2}s",
                program,
                result.exit_code,
                result.duration.as_secs_f64()
            ));
            if !result.stdout.trim().is_empty() {
                print_detail(result.stdout.trim_end());
            }
        }

        if !result.success {
            return Err(LaunchError::BuildFailure {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(())
    }

    fn run_game(&self, request: &BuildRequest) -> Result<String, LaunchError> {
        let executable = request.executable_path();
        let result = run_captured(&executable, &[] as &[&str], &self.project_root)?;

        if !result.success {
            return Err(LaunchError::RunFailure {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(result.stdout)
    }
}
