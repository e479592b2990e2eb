// grove: multi-repository source-control orchestrator
//
// SPDX-FileCopyrightText: 2026 Grove contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sub-repository discovery via maven effective-POM introspection.
//!
//! `mvn -N help:effective-pom` prints the fully resolved project descriptor,
//! one XML-ish line at a time; every `<module>` line in it names a
//! sub-repository. The output is scanned line by line rather than parsed as
//! XML, matching what the resolved descriptor actually looks like. The
//! scanning lives in [`parse_module_lines`] so the strategy can change
//! without touching the discovery callers.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::process::ProcessBuilder;

/// Matches a `<module>NAME</module>` line, anchored at the line start.
fn module_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^<module>(.*?)</module>").expect("valid module pattern"))
}

/// Extracts module names from effective-POM output, in output order.
///
/// Lines are trimmed before matching; non-matching lines are ignored.
#[must_use]
pub fn parse_module_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| module_pattern().captures(line))
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Runs the effective-POM introspection in `dir` and returns its output.
async fn effective_pom(mvn: &Path, dir: &Path, descriptor: Option<&str>) -> Result<String> {
    let mut builder = ProcessBuilder::new(mvn)
        .args(["-N", "help:effective-pom"])
        .cwd(dir);
    if let Some(descriptor) = descriptor {
        builder = builder.args(["-f", descriptor]);
    }
    builder.output_trimmed().await
}

/// Module names declared by the parent build descriptor in `dir`.
pub(super) async fn discover_modules(mvn: &Path, dir: &Path) -> Result<Vec<String>> {
    let output = effective_pom(mvn, dir, None).await?;
    Ok(parse_module_lines(&output))
}

/// Addon names declared under `addons_dir`.
///
/// With `include_optional`, a second pass over the alternate descriptor is
/// appended after the primary list.
pub(super) async fn discover_addons(
    mvn: &Path,
    addons_dir: &Path,
    optional_descriptor: &str,
    include_optional: bool,
) -> Result<Vec<String>> {
    let output = effective_pom(mvn, addons_dir, None).await?;
    let mut addons = parse_module_lines(&output);
    if include_optional {
        let optional = effective_pom(mvn, addons_dir, Some(optional_descriptor)).await?;
        addons.extend(parse_module_lines(&optional));
    }
    Ok(addons)
}
