//! npm package-name rules for project names

const MAX_LENGTH: usize = 214;

const RESERVED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Node.js core module names, which npm refuses for new packages
const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
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

/// Validate a project name against npm's rules for new packages.
///
/// Returns every problem found, worded for display after "Sorry, ".
pub fn validate_package_name(name: &str) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push("name length must be greater than zero".to_string());
        return Err(errors);
    }
    if name.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        errors.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        errors.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lowered = name.to_lowercase();
    if RESERVED_NAMES.contains(&lowered.as_str()) {
        errors.push(format!("{} is not a valid package name", name));
    }
    if CORE_MODULES.contains(&name) {
        errors.push(format!("{} is a core module name", name));
    }
    if name.chars().count() > MAX_LENGTH {
        errors.push(format!(
            "name can no longer contain more than {} characters",
            MAX_LENGTH
        ));
    }
    if lowered != name {
        errors.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.chars().any(|c| "~'!()*".contains(c)) {
        errors.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }
    if !is_url_friendly(name) {
        errors.push("name can only contain URL-friendly characters".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Plain names, or `@scope/name` where both parts are plain
fn is_url_friendly(name: &str) -> bool {
    if let Some(scoped) = name.strip_prefix('@') {
        return match scoped.split_once('/') {
            Some((scope, pkg)) => {
                !scope.is_empty() && !pkg.is_empty() && is_plain(scope) && is_plain(pkg)
            }
            None => false,
        };
    }
    is_plain(name)
}

fn is_plain(part: &str) -> bool {
    part.chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c))
}
