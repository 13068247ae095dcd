#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Whole-request timeout enforced by the transport on a page fetch.
    pub fetch_timeout_secs: u64,
    pub fetch_connect_timeout_secs: u64,
    pub fetch_user_agent: String,
}
