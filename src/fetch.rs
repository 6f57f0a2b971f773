//! Template reference resolution and archive fetching.
//! Turns a repository shorthand into a downloadable tarball and keeps a local
//! copy of every archive it fetched so that later runs can work offline.

use crate::constants::{CACHE_ENV, DEFAULT_ORG, DEFAULT_REF};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use regex::Regex;
use reqwest::StatusCode;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(github|gitlab|bitbucket):)?([\w.-]+)/([\w.-]+)$")
        .expect("valid shorthand pattern")
});

/// Hosting service a template repository lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    GitHub,
    GitLab,
    Bitbucket,
}

impl Site {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "github" | "github.com" => Some(Self::GitHub),
            "gitlab" | "gitlab.com" => Some(Self::GitLab),
            "bitbucket" | "bitbucket.org" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }
}

/// A resolved template repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReference {
    repo: String,
    site: Site,
    owner: String,
    name: String,
    git_ref: String,
}

impl std::fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repo)
    }
}

impl TemplateReference {
    /// Resolves a repository shorthand, URL or `git@` address.
    ///
    /// A shorthand without `/` is assumed to live in the default organization.
    ///
    /// # Errors
    /// * `Error::InvalidTemplateReference` if the input names no owner/repository pair
    pub fn resolve(input: &str) -> Result<Self> {
        let input = input.trim();
        let repo = if input.contains('/') {
            input.to_string()
        } else {
            let repo = format!("{DEFAULT_ORG}/{input}");
            info!("Assuming you meant {repo}...");
            repo
        };

        let (location, git_ref) = match repo.split_once('#') {
            Some((location, git_ref)) if !git_ref.is_empty() => (location, git_ref),
            Some((location, _)) => (location, DEFAULT_REF),
            None => (repo.as_str(), DEFAULT_REF),
        };

        let (site, owner, name) = Self::parse_location(location)
            .ok_or_else(|| Error::InvalidTemplateReference(repo.clone()))?;

        Ok(Self { repo: repo.clone(), site, owner, name, git_ref: git_ref.to_string() })
    }

    fn parse_location(location: &str) -> Option<(Site, String, String)> {
        // Full https URL
        if let Ok(url) = Url::parse(location) {
            if url.scheme() == "https" || url.scheme() == "http" {
                let site = Site::from_name(url.host_str()?.trim_start_matches("www."))?;
                let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
                let owner = segments.next()?.to_string();
                let name = segments.next()?.trim_end_matches(".git").to_string();
                return Some((site, owner, name));
            }
        }

        // SSH address, git@github.com:owner/name.git
        if let Some(rest) = location.strip_prefix("git@") {
            let (host, path) = rest.split_once(':')?;
            let site = Site::from_name(host)?;
            let (owner, name) = path.split_once('/')?;
            return Some((site, owner.to_string(), name.trim_end_matches(".git").to_string()));
        }

        let caps = SHORTHAND.captures(location)?;
        let site = caps.get(1).map_or(Some(Site::GitHub), |s| Site::from_name(s.as_str()))?;
        Some((site, caps[2].to_string(), caps[3].to_string()))
    }

    /// The normalized reference as typed, e.g. `preactjs-templates/default`.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    /// Download location of the repository tarball.
    pub fn archive_url(&self) -> String {
        let (owner, name, git_ref) = (&self.owner, &self.name, &self.git_ref);
        match self.site {
            Site::GitHub => format!("https://github.com/{owner}/{name}/archive/{git_ref}.tar.gz"),
            Site::GitLab => format!(
                "https://gitlab.com/{owner}/{name}/repository/archive.tar.gz?ref={git_ref}"
            ),
            Site::Bitbucket => format!("https://bitbucket.org/{owner}/{name}/get/{git_ref}.tar.gz"),
        }
    }

    /// Location of the cached archive below `cache_root`.
    pub fn cache_path<P: AsRef<Path>>(&self, cache_root: P) -> PathBuf {
        cache_root
            .as_ref()
            .join(self.site.as_str())
            .join(&self.owner)
            .join(&self.name)
            .join(format!("{}.tar.gz", self.git_ref.replace('/', "_")))
    }
}

/// A gzipped tarball on local storage, ready to be extracted once.
#[derive(Debug)]
pub struct ArchiveHandle {
    path: PathBuf,
}

impl ArchiveHandle {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Obtains the archive of a template repository.
pub trait ArchiveFetcher {
    /// Fetches the archive for `reference`.
    ///
    /// # Errors
    /// * `Error::RepositoryNotFound` if the repository does not exist
    /// * `Error::FetchError` for any other failure
    fn fetch(&self, reference: &TemplateReference) -> Result<ArchiveHandle>;
}

/// Fetches archives over HTTP and caches them on disk.
pub struct RemoteFetcher {
    client: reqwest::blocking::Client,
    cache_root: PathBuf,
}

impl RemoteFetcher {
    pub fn new<P: Into<PathBuf>>(cache_root: P) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::FetchError(e.to_string()))?;
        Ok(Self { client, cache_root: cache_root.into() })
    }

    fn download(&self, url: &str, reference: &TemplateReference, dest: &Path) -> Result<()> {
        debug!("Downloading '{}'.", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::FetchError(e.to_string()))?;

        if let Some(err) = status_error(response.status(), url, reference) {
            return Err(err);
        }

        let bytes = response.bytes().map_err(|e| Error::FetchError(e.to_string()))?;
        let parent = dest.parent().unwrap_or(&self.cache_root);
        std::fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.persist(dest).map_err(|e| Error::IoError(e.error))?;
        debug!("Saved archive to '{}'.", dest.display());
        Ok(())
    }
}

/// Maps an unsuccessful HTTP status to the matching fetch error.
pub fn status_error(status: StatusCode, url: &str, reference: &TemplateReference) -> Option<Error> {
    match status {
        StatusCode::NOT_FOUND => {
            Some(Error::RepositoryNotFound { repo: reference.repo().to_string() })
        }
        status if !status.is_success() => {
            Some(Error::FetchError(format!("{url} responded with {status}")))
        }
        _ => None,
    }
}

impl ArchiveFetcher for RemoteFetcher {
    fn fetch(&self, reference: &TemplateReference) -> Result<ArchiveHandle> {
        let url = reference.archive_url();
        let dest = reference.cache_path(&self.cache_root);

        match self.download(&url, reference, &dest) {
            Ok(()) => Ok(ArchiveHandle::new(dest)),
            Err(e) if dest.is_file() => {
                warn!("{e}; using cached archive '{}'", dest.display());
                Ok(ArchiveHandle::new(dest))
            }
            Err(e) => Err(e),
        }
    }
}

/// Resolves the archive cache directory.
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CACHE_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".coherent-preact")
        .join("cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_names() {
        assert_eq!(Site::from_name("GitLab"), Some(Site::GitLab));
        assert_eq!(Site::from_name("bitbucket.org"), Some(Site::Bitbucket));
        assert_eq!(Site::from_name("example.com"), None);
    }

    #[test]
    fn test_status_error_kinds() {
        let reference = TemplateReference::resolve("owner/repo").unwrap();
        let url = reference.archive_url();

        match status_error(StatusCode::NOT_FOUND, &url, &reference) {
            Some(err @ Error::RepositoryNotFound { .. }) => {
                assert_eq!(err.to_string(), "Could not find repository: owner/repo")
            }
            other => panic!("Expected RepositoryNotFound, got {other:?}"),
        }
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, &url, &reference) {
            Some(Error::FetchError(message)) => assert!(message.contains("500")),
            other => panic!("Expected FetchError, got {other:?}"),
        }
        assert!(status_error(StatusCode::OK, &url, &reference).is_none());
    }

    #[test]
    fn test_cache_path_flattens_ref() {
        let reference = TemplateReference::resolve("owner/repo#feature/x").unwrap();
        assert_eq!(
            reference.cache_path("/cache"),
            PathBuf::from("/cache/github/owner/repo/feature_x.tar.gz")
        );
    }
}
