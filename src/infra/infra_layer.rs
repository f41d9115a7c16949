// The infra module contains implementations of core traits.
// Each external service gets its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "google/mod.rs"]
pub mod google;

use std::time::Duration;

/// Shared request timeout for every remote call, so a hung service fails the
/// turn instead of wedging it with `pending` stuck true.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used by all infra adapters.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to construct HTTP client")
}
