//! Package name validation.
//! Applies the naming rules a package registry enforces on newly published
//! packages and reports every rule the name breaks.

use regex::Regex;
use std::sync::LazyLock;

const MAX_LENGTH: usize = 214;

const BLACKLIST: [&str; 2] = ["node_modules", "favicon.ico"];

const CORE_MODULES: [&str; 40] = [
    "assert",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

static SCOPED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:@([^/]+?)/)?([^/]+?)$").expect("valid scoped name pattern"));

/// Characters left untouched by URI component encoding.
fn is_url_friendly(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c))
}

fn has_special_characters(s: &str) -> bool {
    s.chars().any(|c| "~'!()*".contains(c))
}

/// Validates `name` as a new package name.
///
/// # Returns
/// * `Vec<String>` - Every violated rule, empty when the name is valid
pub fn validate_package_name(name: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if name.is_empty() {
        violations.push("name length must be greater than zero".to_string());
        return violations;
    }
    if name.starts_with('.') {
        violations.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        violations.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        violations.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lower = name.to_lowercase();
    if let Some(blacklisted) = BLACKLIST.iter().find(|b| **b == lower) {
        violations.push(format!("{blacklisted} is a blacklisted name"));
    }
    if CORE_MODULES.contains(&lower.as_str()) {
        violations.push(format!("{lower} is a core module name"));
    }
    if name.chars().count() > MAX_LENGTH {
        violations.push(format!(
            "name can no longer contain more than {MAX_LENGTH} characters"
        ));
    }
    if lower != name {
        violations.push("name can no longer contain capital letters".to_string());
    }

    let unscoped = name.rsplit('/').next().unwrap_or(name);
    if has_special_characters(unscoped) {
        violations
            .push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }

    if !is_url_friendly(name) {
        let scoped_ok = SCOPED_NAME
            .captures(name)
            .map(|caps| {
                let scope_ok = caps.get(1).is_none_or(|scope| is_url_friendly(scope.as_str()));
                let package_ok = caps.get(2).is_some_and(|pkg| is_url_friendly(pkg.as_str()));
                scope_ok && package_ok
            })
            .unwrap_or(false);
        if !scoped_ok {
            violations.push("name can only contain URL-friendly characters".to_string());
        }
    }

    violations
}
