//! Terminal output utilities

use std::io::{self, BufRead, Write};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Prefix on every launcher message
pub const LOG_PREFIX: &str = "TerraCraft.Compile";

/// Print a progress line
pub fn print_step(message: &str) {
    println!("{}: {}", style(LOG_PREFIX).green().bold(), message);
}

/// Print a detail line (only shown with --verbose)
pub fn print_detail(message: &str) {
    println!("{}: {}", style(LOG_PREFIX).dim(), style(message).dim());
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        style(format!("{} [WARNING]:", LOG_PREFIX)).yellow().bold(),
        message
    );
}

/// Horizontal rule separating launcher output from game output
pub fn separator() -> String {
    "-".repeat(50)
}

/// Create a spinner progress bar
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Whether a person is watching the output
pub fn is_interactive() -> bool {
    console::user_attended()
}

/// Block until the user presses enter
pub fn pause(prompt: &str) {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
