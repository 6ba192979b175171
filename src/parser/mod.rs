//! Extraction phase — turns the Doxygen XML export plus the toolkit
//! checkout into an immutable [`ApiRoot`](crate::model::ApiRoot).

pub mod doxygen;
pub mod resolve;

use crate::model::{ApiRoot, GitInfo};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Parse all definitions, read the source revision, and build the indexes.
/// Everything the generators need comes out of this one call.
pub fn parse_api(toolkit_dir: &Path, doxygen_dir: &Path) -> Result<ApiRoot> {
    let git_info = read_git_info(toolkit_dir)?;

    let enums = doxygen::parse_enums(doxygen_dir)?;
    let structs = doxygen::parse_structs(doxygen_dir)?;
    let classes = doxygen::parse_classes(doxygen_dir)?;

    Ok(resolve::build_api_root(git_info, enums, structs, classes))
}

/// Source-library revision for the provenance banner.
fn read_git_info(toolkit_dir: &Path) -> Result<GitInfo> {
    let tag = git_output(toolkit_dir, &["describe", "--tags"])?;
    let commit = git_output(toolkit_dir, &["rev-parse", "--short", "HEAD"])?;

    debug!("detected git tag {tag}, commit {commit}");

    Ok(GitInfo { tag, commit })
}

fn git_output(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("failed to run git {} in {}", args.join(" "), dir.display()))?;

    if !output.status.success() {
        bail!(
            "git {} failed in {}: {}",
            args.join(" "),
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
