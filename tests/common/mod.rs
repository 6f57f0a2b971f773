#![allow(dead_code)]

use coherent_preact::cli::CreateArgs;
use coherent_preact::error::{Error, Result};
use coherent_preact::fetch::{ArchiveFetcher, ArchiveHandle, TemplateReference};
use coherent_preact::prompt::Prompter;
use coherent_preact::setup::{DependencyInstaller, PackageManager, VersionControl};
use flate2::{write::GzEncoder, Compression};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::{Builder, EntryType, Header};

/// An archive entry: a directory when `content` is None, a link when
/// `link` names a target.
pub struct Entry<'a> {
    pub path: &'a str,
    pub content: Option<&'a [u8]>,
    pub link: Option<(EntryType, &'a Path)>,
}

pub fn directory(path: &str) -> Entry<'_> {
    Entry { path, content: None, link: None }
}

pub fn file<'a>(path: &'a str, content: &'a str) -> Entry<'a> {
    Entry { path, content: Some(content.as_bytes()), link: None }
}

pub fn binary<'a>(path: &'a str, content: &'a [u8]) -> Entry<'a> {
    Entry { path, content: Some(content), link: None }
}

pub fn symlink<'a>(path: &'a str, target: &'a Path) -> Entry<'a> {
    Entry { path, content: None, link: Some((EntryType::Symlink, target)) }
}

pub fn hard_link<'a>(path: &'a str, target: &'a Path) -> Entry<'a> {
    Entry { path, content: None, link: Some((EntryType::Link, target)) }
}

/// Writes a gzipped tarball holding `entries` into `dir`.
pub fn build_archive(dir: &Path, entries: &[Entry]) -> PathBuf {
    let path = dir.join("template.tar.gz");
    let file = File::create(&path).unwrap();
    let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));

    for entry in entries {
        let mut header = Header::new_gnu();
        match (entry.link, entry.content) {
            (Some((kind, target)), _) => {
                header.set_entry_type(kind);
                header.set_mode(0o777);
                header.set_size(0);
                builder.append_link(&mut header, entry.path, target).unwrap();
            }
            (None, Some(data)) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(data.len() as u64);
                builder.append_data(&mut header, entry.path, data).unwrap();
            }
            (None, None) => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder.append_data(&mut header, entry.path, std::io::empty()).unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap();
    path
}

/// A typical template repository archive as served for `<repo>-master`.
pub fn standard_template(dir: &Path, root: &str) -> PathBuf {
    let p = |rest: &str| format!("{root}/{rest}");
    let paths = [
        p("README.md"),
        p("template/"),
        p("template/package.json"),
        p("template/src/"),
        p("template/src/index.js"),
        p("template/src/manifest.json"),
        p("template/src/assets/icon.png"),
    ];
    build_archive(
        dir,
        &[
            file(&paths[0], "# {{ name }} template repository"),
            directory(&paths[1]),
            file(&paths[2], r#"{"name": "{{ name }}", "version": "0.0.0", "private": true}"#),
            directory(&paths[3]),
            file(&paths[4], "export const title = '{{ name }}';\n// {{ author }}\n"),
            file(&paths[5], r#"{"name": "placeholder", "short_name": "placeholder", "display": "standalone"}"#),
            binary(&paths[6], &[0x89, b'P', b'N', b'G', b'{', b'{']),
        ],
    )
}

pub fn create_args(cwd: &Path, template: &str, dest: &str) -> CreateArgs {
    CreateArgs {
        template: Some(template.to_string()),
        dest: Some(PathBuf::from(dest)),
        cwd: cwd.to_path_buf(),
        install: false,
        ..CreateArgs::default()
    }
}

/// Answers prompts from pre-recorded queues.
#[derive(Default)]
pub struct ScriptedPrompter {
    inputs: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(inputs: &[&str], confirms: &[bool]) -> Self {
        Self {
            inputs: RefCell::new(inputs.iter().map(|s| s.to_string()).collect()),
            confirms: RefCell::new(confirms.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, _default: Option<&str>) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.inputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("unexpected prompt: {prompt}")))
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("unexpected prompt: {prompt}")))
    }
}

/// Serves a prepared archive and records every reference it was asked for.
pub struct FixtureFetcher {
    archive: Option<PathBuf>,
    pub requested: RefCell<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new(archive: PathBuf) -> Self {
        Self { archive: Some(archive), requested: RefCell::new(Vec::new()) }
    }

    /// A fetcher for which every repository is missing.
    pub fn not_found() -> Self {
        Self { archive: None, requested: RefCell::new(Vec::new()) }
    }
}

impl ArchiveFetcher for FixtureFetcher {
    fn fetch(&self, reference: &TemplateReference) -> Result<ArchiveHandle> {
        self.requested.borrow_mut().push(reference.repo().to_string());
        match &self.archive {
            Some(path) => Ok(ArchiveHandle::new(path.clone())),
            None => Err(Error::RepositoryNotFound { repo: reference.repo().to_string() }),
        }
    }
}

#[derive(Default)]
pub struct RecordingInstaller {
    pub fail: bool,
    pub calls: RefCell<Vec<(PathBuf, PackageManager)>>,
}

impl DependencyInstaller for RecordingInstaller {
    fn install(&self, target: &Path, package_manager: PackageManager) -> Result<()> {
        self.calls.borrow_mut().push((target.to_path_buf(), package_manager));
        if self.fail {
            return Err(Error::InstallError("`npm install` failed with exit status: 1".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingVcs {
    pub calls: RefCell<Vec<PathBuf>>,
}

impl VersionControl for RecordingVcs {
    fn init(&self, target: &Path) -> Result<()> {
        self.calls.borrow_mut().push(target.to_path_buf());
        Ok(())
    }
}
