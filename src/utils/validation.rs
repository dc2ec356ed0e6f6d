//! Pure predicates for URLs and the telemetry taxonomy.
//!
//! Nothing here touches the network; a URL is "well formed" when it parses
//! as an absolute URL that carries a host.

use url::Url;

/// Stacks a telemetry event may originate from.
pub const STACKS: &[&str] = &["frontend", "backend"];

/// Severity levels accepted by the collector.
pub const LEVELS: &[&str] = &["debug", "info", "warn", "error", "fatal"];

/// Packages that only make sense for the `frontend` stack.
pub const FRONTEND_PACKAGES: &[&str] = &["api", "component", "hook", "page", "state", "style"];

/// Packages that only make sense for the `backend` stack.
pub const BACKEND_PACKAGES: &[&str] = &[
    "cache",
    "controller",
    "cron_job",
    "db",
    "domain",
    "handler",
    "repository",
    "route",
    "service",
];

/// Packages allowed under either stack.
pub const SHARED_PACKAGES: &[&str] = &["auth", "config", "middleware", "utils"];

/// Short codes that collide with the server's own routes.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Returns true if `input` is an absolute URL with a scheme and a host.
///
/// Control characters are rejected outright: the parser would silently drop
/// tabs and newlines, leaving a stored string that is not a valid header.
///
/// ```ignore
/// assert!(is_well_formed_url("https://example.com/path"));
/// assert!(!is_well_formed_url("example.com"));
/// assert!(!is_well_formed_url("mailto:someone@example.com"));
/// assert!(!is_well_formed_url("https://example.com/a\nb"));
/// ```
pub fn is_well_formed_url(input: &str) -> bool {
    if input.chars().any(char::is_control) {
        return false;
    }

    match Url::parse(input) {
        Ok(url) => !url.scheme().is_empty() && url.host().is_some(),
        Err(_) => false,
    }
}

/// Serializes `input` the way it goes on the wire: non-ASCII characters
/// percent-encoded, host punycoded. Unparseable input is returned unchanged.
pub fn redirect_location(input: &str) -> String {
    Url::parse(input).map_or_else(|_| input.to_string(), String::from)
}

/// Returns true if `code` would be shadowed by a server route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `stack` names a known stack (case-insensitive).
pub fn is_known_stack(stack: &str) -> bool {
    contains_ignore_case(STACKS, stack)
}

/// Returns true if `level` names a known severity level (case-insensitive).
pub fn is_known_level(level: &str) -> bool {
    contains_ignore_case(LEVELS, level)
}

/// Returns true if `category` is allowed for events from `stack`.
///
/// Shared packages are accepted under both stacks. An unknown stack accepts
/// nothing.
pub fn is_known_category(stack: &str, category: &str) -> bool {
    let own = if stack.eq_ignore_ascii_case("frontend") {
        FRONTEND_PACKAGES
    } else if stack.eq_ignore_ascii_case("backend") {
        BACKEND_PACKAGES
    } else {
        return false;
    };

    contains_ignore_case(own, category) || contains_ignore_case(SHARED_PACKAGES, category)
}

fn contains_ignore_case(set: &[&str], value: &str) -> bool {
    set.iter().any(|item| item.eq_ignore_ascii_case(value))
}
