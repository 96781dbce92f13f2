//! Path utilities for entry discovery.
//!
//! Entry paths are reported relative to the working directory with forward
//! slashes, regardless of platform.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => {
                // Leading .. components are kept; they point above the base
                match components.last() {
                    Some(Utf8Component::Normal(_)) => {
                        components.pop();
                    },
                    _ => components.push(component),
                }
            },
            other => {
                components.push(other);
            },
        }
    }

    components.iter().collect()
}

/// Render a relative path with `/` separators
pub fn to_slash(path: &Utf8Path) -> String {
    path.components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}
