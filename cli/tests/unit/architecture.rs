//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify the layering: `domain` is pure,
//! `application` talks to the host only through ports, and `infra` never
//! writes to the terminal.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and return its non-comment lines outside `#[cfg(test)]` blocks.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    let mut depth = 0i32;
    let mut test_depth: Option<i32> = None;
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(") && trimmed.contains("test") && test_depth.is_none() {
            test_depth = Some(depth);
        }
        let in_test = test_depth.is_some();
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if test_depth.is_some_and(|d| depth <= d) {
                        test_depth = None;
                    }
                }
                _ => {}
            }
        }
        if !in_test && !trimmed.starts_with("//") {
            lines.push((i + 1, line.to_string()));
        }
    }
    lines
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer);
    let mut found = Vec::new();
    for file in collect_rs_files(&dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{rel}:{lineno}: `{pattern}` in {layer}/: {line}"));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations(
        "domain",
        &[
            "crate::application",
            "crate::infra",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
        ],
    );
    assert!(found.is_empty(), "domain purity violations:\n{}", found.join("\n"));
}

#[test]
fn application_has_no_infra_or_output_imports() {
    let found = violations(
        "application",
        &["crate::infra", "crate::output", "std::fs::", "tokio::process"],
    );
    assert!(found.is_empty(), "application violations:\n{}", found.join("\n"));
}

#[test]
fn infra_has_no_output_imports_or_prints() {
    let found = violations(
        "infra",
        &["crate::output", "crate::commands", "println!", "eprintln!"],
    );
    assert!(found.is_empty(), "infra violations:\n{}", found.join("\n"));
}

#[test]
fn provisioner_never_mutates_its_own_environment() {
    let mut found = Vec::new();
    for layer in ["domain", "application", "infra", "commands"] {
        found.extend(violations(layer, &["set_var", "remove_var"]));
    }
    assert!(found.is_empty(), "process env mutation:\n{}", found.join("\n"));
}
