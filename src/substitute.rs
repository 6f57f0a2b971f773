//! Placeholder substitution for extracted template files.
//! Rewrites `{{ key }}` tokens in place, one file at a time.

use crate::constants::PLACEHOLDER_KEYS;
use crate::error::{Error, Result};
use crate::extract::KeptFileSet;
use log::debug;
use regex::{NoExpand, Regex};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Compiles the token pattern for `key`, tolerating one space inside each brace pair.
pub fn placeholder_pattern(key: &str) -> Regex {
    Regex::new(&format!(r"\{{\{{\s?{}\s?\}}\}}", regex::escape(key)))
        .expect("escaped placeholder key is a valid pattern")
}

/// Immutable list of (pattern, replacement) pairs applied to every kept file.
#[derive(Debug, Default)]
pub struct Substitutions {
    pairs: Vec<(Regex, String)>,
}

impl Substitutions {
    /// Builds the substitutions for every known key that has a value.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a key, or None when it is undefined
    pub fn from_values<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let pairs = PLACEHOLDER_KEYS
            .iter()
            .copied()
            .filter_map(|key| lookup(key).map(|value| (placeholder_pattern(key), value.to_string())))
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Replaces every occurrence of every pattern in `content`.
    pub fn apply(&self, content: &str) -> String {
        self.pairs.iter().fold(content.to_string(), |acc, (pattern, value)| {
            pattern.replace_all(&acc, NoExpand(value.as_str())).into_owned()
        })
    }

    /// Rewrites one file in place.
    ///
    /// The new content goes to a temporary sibling file which then replaces
    /// the original, so a failure never leaves a half-written file behind.
    /// Files that are not UTF-8 text or that contain no token are left alone.
    pub fn apply_to_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let Ok(content) = String::from_utf8(bytes) else {
            debug!("Skipping non UTF-8 file '{}'", path.display());
            return Ok(false);
        };

        let replaced = self.apply(&content);
        if replaced == content {
            return Ok(false);
        }

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let permissions = fs::metadata(path)?.permissions();
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(replaced.as_bytes())?;
        fs::set_permissions(tmp.path(), permissions)?;
        tmp.persist(path).map_err(|e| Error::IoError(e.error))?;

        debug!("Substituted placeholders in '{}'", path.display());
        Ok(true)
    }

    /// Applies the substitutions to every kept file, sequentially.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of files that were rewritten
    pub fn apply_to_files(&self, files: &KeptFileSet) -> Result<usize> {
        let mut rewritten = 0;
        for file in files {
            if self.apply_to_file(file)? {
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }
}
