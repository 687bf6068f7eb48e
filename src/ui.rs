use crate::orchestrator::ReleaseOutcome;

pub fn display_error(message: &str) {
    // workflow command, marks the step as failed in the runner log
    if std::env::var_os("GITHUB_ACTIONS").is_some() {
        println!("::error::{}", escape_command_data(message));
    }
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

/// Escape `%`, CR and LF for workflow command payloads
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// First line of a message, at most 60 chars, never readable as a workflow command
pub fn commit_summary(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    let short_msg: String = first_line.chars().take(60).collect();
    if short_msg.trim_start().starts_with("::") {
        format!("`{}`", escape_command_data(&short_msg))
    } else {
        short_msg
    }
}

pub fn display_commit_analysis(messages: &[String]) {
    println!("\n\x1b[1mCommits since last release\x1b[0m");

    for (i, message) in messages.iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, commit_summary(message));
    }

    if messages.len() > 10 {
        println!("  ... and {} more commits", messages.len() - 10);
    }
}

pub fn display_outcome(outcome: &ReleaseOutcome, dry_run: bool) {
    if !outcome.messages.is_empty() {
        display_commit_analysis(&outcome.messages);
    }

    println!();
    if outcome.released {
        println!("\x1b[1mRelease created:\x1b[0m");
        println!("  From: \x1b[31m{}\x1b[0m", outcome.old_version);
        println!("  To:   \x1b[32m{}\x1b[0m", outcome.new_version);
    } else if dry_run && !outcome.new_version.is_empty() {
        display_status(&format!(
            "Dry run: would release {} (from {})",
            outcome.new_version, outcome.old_version
        ));
    } else {
        display_status(&format!(
            "No release-worthy commits since {}",
            outcome.old_version
        ));
    }
}
