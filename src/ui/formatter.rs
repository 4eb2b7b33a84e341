//! Pure formatting functions for UI output.
//!
//! `render_*` functions build the text; `display_*` functions print it.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::commands::TagListing;
use crate::domain::{AnnotatedTag, Version};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Field-by-field description of a version
pub fn render_version(version: &Version) -> String {
    let or_none = |s: &str| {
        if s.is_empty() {
            "(none)".to_string()
        } else {
            s.to_string()
        }
    };

    format!(
        "version:     {}\nmajor:       {}\nminor:       {}\npatch:       {}\npre-release: {}\nbuild:       {}\nv prefix:    {}",
        version,
        version.major(),
        version.minor(),
        version.patch(),
        or_none(version.pre_release_label()),
        or_none(version.build_metadata()),
        version.include_v_prefix()
    )
}

pub fn display_version(version: &Version) {
    println!("{}", render_version(version));
}

/// One line per tag; tags that are not versions are dimmed
pub fn display_tag_listing(tags: &[TagListing]) {
    for tag in tags {
        match tag.version {
            Some(_) => println!("  {}", tag.name),
            None => println!("  {}", style(&tag.name).dim()),
        }
    }
}

/// Metadata of an annotated tag
pub fn render_annotated_tag(tag: &AnnotatedTag) -> String {
    let mut out = format!("tag {}\n", tag.short_name());
    if !tag.tagger().is_empty() || !tag.tagger_email().is_empty() {
        out.push_str(&format!("Tagger: {} <{}>\n", tag.tagger(), tag.tagger_email()));
    }
    out.push_str(&format!("Date:   {}\n", tag.ts().to_rfc3339()));
    if !tag.full_message().is_empty() {
        out.push('\n');
        out.push_str(tag.full_message());
        out.push('\n');
    }
    out
}

pub fn display_annotated_tag(tag: &AnnotatedTag) {
    print!("{}", render_annotated_tag(tag));
}

/// Display the proposed tag change.
pub fn display_proposed_tag(old: &str, new_tag: &str) {
    println!("\n{}", style("Proposed Tag:").bold());
    println!("  From: {}", style(old).red());
    println!("  To:   {}", style(new_tag).green());
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}
