//! Path utilities for the launcher

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::LaunchError;

/// Data directory, relative to the project root
pub const DATA_DIR: &str = "data";
/// Source directory, relative to the project root
pub const SOURCE_DIR: &str = "data/src";
/// Include directory, relative to the project root
pub const INCLUDE_DIR: &str = "data/inc";
/// Binary output directory, relative to the project root
pub const BINARY_DIR: &str = "bin";
/// Entry point, always first on the compiler command line
pub const ENTRY_POINT: &str = "main.c";

/// Directory containing the running launcher executable
pub fn launcher_dir() -> Result<PathBuf, LaunchError> {
    let exe = std::env::current_exe()
        .map_err(|e| LaunchError::io("Failed to locate the launcher executable", e))?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Search from the launcher's directory, then from the current directory.
///
/// An installed launcher (e.g. `~/.cargo/bin`) has no project above it, so
/// running it from anywhere inside the tree still finds the root.
pub fn find_project_root_default(project_name: &str) -> Result<PathBuf, LaunchError> {
    let mut starts = vec![launcher_dir()?];
    if let Ok(cwd) = std::env::current_dir() {
        starts.push(cwd);
    }
    find_project_root_any(&starts, project_name)
}

/// First root found walking up from each start in turn
pub fn find_project_root_any(starts: &[PathBuf], project_name: &str) -> Result<PathBuf, LaunchError> {
    let mut first_err = None;
    for start in starts {
        match find_project_root_from(start, project_name) {
            Ok(root) => return Ok(root),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    Err(first_err.unwrap_or_else(|| LaunchError::RootNotFound {
        name: project_name.to_string(),
        start: PathBuf::new(),
    }))
}

/// Walk upward from `start` until a directory named `project_name` is found
pub fn find_project_root_from(start: &Path, project_name: &str) -> Result<PathBuf, LaunchError> {
    let mut dir = start;
    loop {
        if dir.file_name().is_some_and(|name| name == project_name) {
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => {
                return Err(LaunchError::RootNotFound {
                    name: project_name.to_string(),
                    start: start.to_path_buf(),
                })
            }
        }
    }
}

/// Outcome of preparing the binary directory
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Whether the directory had to be created
    pub created: bool,
    /// Files removed
    pub removed: Vec<PathBuf>,
    /// Subdirectories left in place
    pub skipped_dirs: Vec<PathBuf>,
}

/// Ensure `bin_dir` exists and holds no files.
///
/// Only direct children are removed; subdirectories are left untouched.
pub fn prepare_binary_dir(bin_dir: &Path) -> Result<CleanReport, LaunchError> {
    let mut report = CleanReport::default();

    if !bin_dir.exists() {
        fs::create_dir_all(bin_dir).map_err(|e| {
            LaunchError::io(format!("Failed to create directory: {}", bin_dir.display()), e)
        })?;
        report.created = true;
        return Ok(report);
    }

    let entries = fs::read_dir(bin_dir).map_err(|e| {
        LaunchError::io(format!("Failed to read directory: {}", bin_dir.display()), e)
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            LaunchError::io(format!("Failed to read directory: {}", bin_dir.display()), e)
        })?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| LaunchError::io(format!("Failed to inspect {}", path.display()), e))?;

        if file_type.is_dir() {
            report.skipped_dirs.push(path);
            continue;
        }

        fs::remove_file(&path)
            .map_err(|e| LaunchError::io(format!("Failed to remove {}", path.display()), e))?;
        report.removed.push(path);
    }

    Ok(report)
}

/// Files directly inside `data/src`, relative to the root and sorted by name
pub fn list_sources(project_root: &Path) -> Result<Vec<PathBuf>, LaunchError> {
    let source_dir = project_root.join(SOURCE_DIR);
    if !source_dir.is_dir() {
        return Err(LaunchError::project_structure_error(
            format!("source directory not found: {}", source_dir.display()),
            expected_layout(),
            format!("Create '{}' and place the game's .c files in it.", SOURCE_DIR),
        ));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(&source_dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            LaunchError::Unexpected(anyhow::Error::new(e).context(format!(
                "Failed to list {}",
                source_dir.display()
            )))
        })?;
        if entry.file_type().is_file() {
            sources.push(Path::new(SOURCE_DIR).join(entry.file_name()));
        }
    }

    Ok(sources)
}

/// Verify the entry point exists under the root
pub fn require_entry_point(project_root: &Path) -> Result<PathBuf, LaunchError> {
    let entry = project_root.join(ENTRY_POINT);
    if !entry.is_file() {
        return Err(LaunchError::project_structure_error(
            format!("entry point not found: {}", entry.display()),
            expected_layout(),
            format!("The launcher always compiles '{}' from the project root.", ENTRY_POINT),
        ));
    }
    Ok(PathBuf::from(ENTRY_POINT))
}

fn expected_layout() -> Vec<String> {
    vec![
        format!("{}/{}", crate::config::PROJECT_NAME, ENTRY_POINT),
        format!("{}/{}/", crate::config::PROJECT_NAME, SOURCE_DIR),
        format!("{}/{}/", crate::config::PROJECT_NAME, INCLUDE_DIR),
    ]
}
