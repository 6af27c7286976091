//! Crate-wide default values.

use std::time::Duration;

/// Default per-request timeout applied when the configuration leaves it unset.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Path suffixes that never receive an `Authorization` header.
pub const PUBLIC_PATHS: &[&str] = &["/auth/login", "/auth/register"];
