//! Filtered extraction of template archives.
//! Only entries below a `template/` directory are written to the target, with
//! the leading `<repo>-<ref>/template/` components removed.

use crate::constants::{MEDIA_PATTERN, STRIP_COMPONENTS, TEMPLATE_MARKER};
use crate::error::Result;
use crate::fetch::ArchiveHandle;
use flate2::read::GzDecoder;
use log::{debug, warn};
use regex::Regex;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tar::Archive;

static MEDIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MEDIA_PATTERN).expect("valid media pattern"));

/// Returns true for fonts, images and video, which are never substituted.
pub fn is_media(path: &str) -> bool {
    MEDIA.is_match(path)
}

/// Extracted files eligible for placeholder substitution, in archive order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeptFileSet {
    files: Vec<PathBuf>,
}

impl KeptFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a KeptFileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Removes the first `count` components of an archive path.
///
/// # Returns
/// * `Option<PathBuf>` - The remainder, or None when nothing is left or the
///   remainder would escape the destination directory
pub fn strip_components(path: &Path, count: usize) -> Option<PathBuf> {
    let rest: Vec<Component> = path.components().skip(count).collect();
    if rest.is_empty() {
        return None;
    }
    if !rest.iter().all(|c| matches!(c, Component::Normal(_))) {
        warn!("Skipping unsafe archive entry '{}'", path.display());
        return None;
    }
    Some(rest.iter().collect())
}

/// Returns the first path below `target`, up to and including `target/relative`,
/// that already exists as a symbolic link.
fn symlinked_ancestor(target: &Path, relative: &Path) -> Option<PathBuf> {
    let mut current = target.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => return Some(current),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

/// Extracts the `template/` subtree of `archive` into `target`.
///
/// Directories and media files are written to disk but only regular,
/// non-media files are recorded in the returned set. Links and special files
/// are skipped, as is any entry that would be written through an existing
/// symbolic link. An empty set means the archive had no usable `template/`
/// directory.
///
/// # Arguments
/// * `archive` - Gzipped tarball to extract; consumed
/// * `target` - Destination root, created if missing
pub fn extract_template<P: AsRef<Path>>(archive: ArchiveHandle, target: P) -> Result<KeptFileSet> {
    let target = target.as_ref();
    fs::create_dir_all(target)?;

    debug!("Extracting '{}' into '{}'.", archive.path().display(), target.display());
    let mut tarball = Archive::new(GzDecoder::new(File::open(archive.path())?));
    let mut keeps = KeptFileSet::new();

    for entry in tarball.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let entry_str = entry_path.to_string_lossy();

        if !entry_str.contains(TEMPLATE_MARKER) {
            debug!("Skipping '{}'", entry_str);
            continue;
        }

        let Some(relative) = strip_components(&entry_path, STRIP_COMPONENTS) else {
            continue;
        };
        let dest = target.join(&relative);

        if let Some(link) = symlinked_ancestor(target, &relative) {
            warn!("Skipping '{}': '{}' is a symbolic link", entry_str, link.display());
            continue;
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }
        if !entry_type.is_file() {
            warn!("Skipping '{}': unsupported entry type {:?}", entry_str, entry_type);
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&dest)?;

        if !is_media(&relative.to_string_lossy()) {
            debug!("Keeping '{}'", dest.display());
            keeps.push(dest);
        } else {
            debug!("Extracted '{}' without substitution", dest.display());
        }
    }

    Ok(keeps)
}
