//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_annotated_tag, display_boundary_warning, display_error,
    display_manual_push_instruction, display_proposed_tag, display_status, display_success,
    display_tag_listing, display_version,
};

/// Interpret a y/N answer; anything but "y" or "yes" declines
pub fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Prompts user for a yes/no confirmation.
///
/// # Arguments
/// * `prompt` - The prompt message to display (without the "(y/N): " suffix)
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    confirm_from(prompt, &mut io::stdin().lock())
}

/// Ask whether a freshly created tag should be pushed.
pub fn confirm_push_tag(tag: &str, remote: &str) -> Result<bool> {
    confirm_action(&format!(
        "Tag '{}' created locally. Push tags to remote '{}'?",
        tag, remote
    ))
}

fn confirm_from<R: BufRead>(prompt: &str, input: &mut R) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(is_affirmative(&line))
}
