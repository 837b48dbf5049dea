//! Shared HTTP Client Module
//!
//! One lazily built client for every outbound audit call, so connections and
//! TLS sessions are reused across requests. The client holds no audit state.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for the reasoning gateway and the hosted audit function
///
/// - 120s default timeout; backends narrow it per request from their config
/// - 90s idle timeout to balance resource usage and performance
pub static AUDIT_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create audit HTTP client")
});

#[inline]
pub fn audit_client() -> &'static Client {
    &AUDIT_CLIENT
}
