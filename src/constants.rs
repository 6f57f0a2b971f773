//! Common constants used throughout coherent-preact.

/// Organization assumed for template references without an owner.
pub const DEFAULT_ORG: &str = "preactjs-templates";

/// Git reference used when a template reference names none.
pub const DEFAULT_REF: &str = "master";

/// Path marker an archive entry must contain to be extracted.
pub const TEMPLATE_MARKER: &str = "/template/";

/// Leading path components removed from every extracted entry
/// (`<repo>-<ref>/template/`).
pub const STRIP_COMPONENTS: usize = 2;

/// Files matching this pattern are extracted but never substituted.
pub const MEDIA_PATTERN: &str = r"(?i)\.(woff2?|ttf|eot|jpe?g|ico|png|gif|mp4|mov|ogg|webm)(\?.*)?$";

/// Keys that may appear as `{{ key }}` placeholders in template files.
pub const PLACEHOLDER_KEYS: [&str; 1] = ["name"];

pub const PACKAGE_MANIFEST: &str = "package.json";

pub const APP_MANIFEST: &str = "manifest.json";

/// Longest `short_name` that downstream consumers display untruncated.
pub const SHORT_NAME_LIMIT: usize = 12;

/// Environment variable overriding the archive cache directory.
pub const CACHE_ENV: &str = "COHERENT_PREACT_CACHE";

pub const CLI_NAME: &str = "coherent-preact";
