//! Entry-point discovery from include/exclude globs
//!
//! Globs are relative to the working directory. A leading `!` turns a glob
//! into an exclusion. Each include glob is walked from its literal base
//! directory in sorted order, so results are stable across runs.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use indexmap::IndexSet;
use std::path::Path;
use strata_core::error::StrataError;
use strata_core::utils::{normalize_path, to_slash};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::ConfigResult;

/// Globs used when no entry globs are configured
pub const DEFAULT_ENTRY_GLOBS: &[&str] = &["src/**/*.ts"];

/// Prefix marking a glob as an exclusion
pub const EXCLUDE_MARKER: char = '!';

/// One compiled include glob
#[derive(Debug, Clone)]
struct IncludeGlob {
    glob: Glob,
    matcher: GlobMatcher,
    /// Directory the walk starts from, relative to the working directory
    base: Utf8PathBuf,
    /// Walk depth limit below `base`, unless the glob contains `**`
    max_depth: Option<usize>,
    /// Dot-prefixed names are only matched when the glob spells the dot
    matches_dot: bool,
}

/// Compiled include and exclude globs
#[derive(Debug, Clone)]
pub struct EntryGlobs {
    include: Vec<IncludeGlob>,
    exclude: GlobSet,
    exclude_count: usize,
}

impl EntryGlobs {
    /// Partition and compile a list of globs
    pub fn parse<S: AsRef<str>>(globs: &[S]) -> ConfigResult<Self> {
        let mut include = Vec::new();
        let mut exclude = GlobSetBuilder::new();
        let mut exclude_count = 0;

        for glob in globs {
            let glob = glob.as_ref();
            match glob.strip_prefix(EXCLUDE_MARKER) {
                Some(negated) => {
                    exclude.add(compile(negated)?);
                    exclude_count += 1;
                },
                None => include.push(IncludeGlob::new(glob)?),
            }
        }

        let exclude = exclude.build().map_err(|e| StrataError::InvalidGlob {
            pattern: globs
                .iter()
                .map(|g| g.as_ref())
                .filter(|g| g.starts_with(EXCLUDE_MARKER))
                .collect::<Vec<_>>()
                .join(" "),
            message: e.to_string(),
        })?;

        Ok(Self {
            include,
            exclude,
            exclude_count,
        })
    }

    /// Check if a slash-separated relative path is excluded.
    ///
    /// Applies to directories too: an excluded directory drops everything
    /// below it.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.is_match(relative)
    }

    /// Number of include globs
    pub fn include_count(&self) -> usize {
        self.include.len()
    }

    /// Number of exclude globs
    pub fn exclude_count(&self) -> usize {
        self.exclude_count
    }

    /// Resolve the globs against `cwd`.
    ///
    /// Returns regular files only, relative to `cwd`, without duplicates.
    pub fn resolve(&self, cwd: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut entries = IndexSet::new();

        for glob in &self.include {
            let root = cwd.join(&glob.base);
            if !root.is_dir() {
                debug!("Skipping glob '{}': {} is not a directory", glob.glob, root);
                continue;
            }

            let mut walker = WalkDir::new(&root)
                .min_depth(1)
                .follow_links(true)
                .sort_by_file_name();
            if let Some(depth) = glob.max_depth {
                walker = walker.max_depth(depth);
            }

            let walker = walker
                .into_iter()
                .filter_entry(|entry| self.should_descend(glob, cwd, entry));

            for result in walker {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!("Error walking entry: {}", err);
                        continue;
                    },
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let Some(slashed) = relative_slash(cwd, entry.path()) else {
                    warn!("Skipping non UTF-8 path: {}", entry.path().display());
                    continue;
                };

                if glob.matcher.is_match(&slashed) {
                    entries.insert(Utf8PathBuf::from(slashed));
                }
            }
        }

        entries.into_iter().collect()
    }

    /// Prunes hidden names the glob does not ask for and excluded paths
    fn should_descend(&self, glob: &IncludeGlob, cwd: &Utf8Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if !glob.matches_dot && entry.file_name().to_string_lossy().starts_with('.') {
            return false;
        }
        match relative_slash(cwd, entry.path()) {
            Some(slashed) => !self.is_excluded(&slashed),
            None => true,
        }
    }
}

impl IncludeGlob {
    fn new(glob: &str) -> ConfigResult<Self> {
        let compiled = compile(glob)?;
        let normalized = compiled.glob();

        let components: Vec<&str> = normalized.split('/').collect();
        let (dirs, _file) = components.split_at(components.len().saturating_sub(1));
        let literal = dirs.iter().take_while(|c| !has_meta(c)).count();

        let base = normalize_path(Utf8Path::new(&dirs[..literal].join("/")));
        let max_depth = if normalized.contains("**") {
            None
        } else {
            Some(components.len() - literal)
        };
        let matches_dot = components[literal..].iter().any(|c| c.starts_with('.'));

        Ok(Self {
            matcher: compiled.compile_matcher(),
            glob: compiled,
            base,
            max_depth,
            matches_dot,
        })
    }
}

/// Expand entry globs against `cwd`
pub fn resolve_entries<S: AsRef<str>>(globs: &[S], cwd: &Utf8Path) -> ConfigResult<Vec<Utf8PathBuf>> {
    let globs = EntryGlobs::parse(globs)?;
    let entries = globs.resolve(cwd);
    debug!(
        "Resolved {} entries from {} include / {} exclude globs",
        entries.len(),
        globs.include_count(),
        globs.exclude_count()
    );
    Ok(entries)
}

fn compile(glob: &str) -> ConfigResult<Glob> {
    let trimmed = glob.strip_prefix("./").unwrap_or(glob);
    GlobBuilder::new(trimmed)
        .literal_separator(true)
        .build()
        .map_err(|e| StrataError::InvalidGlob {
            pattern: glob.to_string(),
            message: e.kind().to_string(),
        })
}

fn relative_slash(cwd: &Utf8Path, path: &Path) -> Option<String> {
    let path = Utf8Path::from_path(path)?;
    let relative = path.strip_prefix(cwd).unwrap_or(path);
    Some(to_slash(relative))
}

fn has_meta(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}
