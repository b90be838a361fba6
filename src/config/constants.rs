//! Constants for cssopt

/// Build file looked up when none is given on the command line
pub const DEFAULT_BUILD_FILE: &str = "optimise-css.build.js";

/// Mode used when a build file omits `optimizeCss`
pub const DEFAULT_MODE: &str = "standard.keepLines";

/// Default log filter for the console layer
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Url schemes that are never inlined or rebased
pub const REMOTE_PREFIXES: &[&str] = &["http:", "https:", "//", "data:"];
