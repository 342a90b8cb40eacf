use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub keywords_path: PathBuf,
    pub data_dir: PathBuf,
    pub serpapi_key: Option<String>,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub page_delay_ms: u64,
    pub default_target_count: usize,
    pub max_target_count: usize,
    pub language: String,
    pub country: String,
    pub scoring_enabled: bool,
    pub history_limit: usize,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub alert_recipients: Vec<String>,
}

impl AppConfig {
    /// Fixed location of the xlsx report, rewritten on every run.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("serp_monitoring_results.xlsx")
    }

    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("serp_history.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("keywords_path", &self.keywords_path)
            .field("data_dir", &self.data_dir)
            .field(
                "serpapi_key",
                &self.serpapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("default_target_count", &self.default_target_count)
            .field("max_target_count", &self.max_target_count)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("scoring_enabled", &self.scoring_enabled)
            .field("history_limit", &self.history_limit)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("sender_email", &self.sender_email)
            .field(
                "sender_password",
                &self.sender_password.as_ref().map(|_| "[redacted]"),
            )
            .field("alert_recipients", &self.alert_recipients)
            .finish()
    }
}
