use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; credentials are optional because a run without
/// them still completes (each source simply contributes zero results).
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("SERPWATCH_ENV", "development"))?;
    let bind_addr = parse_addr("SERPWATCH_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("SERPWATCH_LOG_LEVEL", "info");
    let keywords_path = PathBuf::from(or_default(
        "SERPWATCH_KEYWORDS_PATH",
        "./config/keywords.yaml",
    ));
    let data_dir = PathBuf::from(or_default("SERPWATCH_DATA_DIR", "./data"));

    let serpapi_key = optional("SERPAPI_KEY");
    let provider_base_url = or_default("SERPWATCH_PROVIDER_BASE_URL", "https://serpapi.com/search");
    let provider_timeout_secs = parse_u64("SERPWATCH_PROVIDER_TIMEOUT_SECS", "15")?;
    let page_delay_ms = parse_u64("SERPWATCH_PAGE_DELAY_MS", "500")?;

    let default_target_count = parse_usize("SERPWATCH_DEFAULT_TARGET_COUNT", "10")?;
    let max_target_count = parse_usize("SERPWATCH_MAX_TARGET_COUNT", "100")?;
    if max_target_count == 0 {
        return Err(invalid(
            "SERPWATCH_MAX_TARGET_COUNT",
            "must be at least 1".to_string(),
        ));
    }
    if default_target_count == 0 || default_target_count > max_target_count {
        return Err(invalid(
            "SERPWATCH_DEFAULT_TARGET_COUNT",
            format!("must be between 1 and {max_target_count}"),
        ));
    }

    let language = or_default("SERPWATCH_LANGUAGE", "it");
    let country = or_default("SERPWATCH_COUNTRY", "it");
    let scoring_enabled = parse_bool("SERPWATCH_SCORING_ENABLED", "true")?;
    let history_limit = parse_usize("SERPWATCH_HISTORY_LIMIT", "90")?;

    let smtp_server = or_default("SMTP_SERVER", "smtp.gmail.com");
    let smtp_port = parse_u16("SMTP_PORT", "587")?;
    let sender_email = optional("SENDER_EMAIL");
    let sender_password = optional("SENDER_PASSWORD");
    let alert_recipients = optional("ALERT_EMAIL")
        .map(|raw| split_recipients(&raw))
        .unwrap_or_default();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        keywords_path,
        data_dir,
        serpapi_key,
        provider_base_url,
        provider_timeout_secs,
        page_delay_ms,
        default_target_count,
        max_target_count,
        language,
        country,
        scoring_enabled,
        history_limit,
        smtp_server,
        smtp_port,
        sender_email,
        sender_password,
        alert_recipients,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SERPWATCH_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Splits a comma-separated recipient list, dropping blanks.
#[must_use]
pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    fn invalid_var(result: &Result<AppConfig, ConfigError>) -> Option<&str> {
        match result {
            Err(ConfigError::InvalidEnvVar { var, .. }) => Some(var.as_str()),
            _ => None,
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(
            parse_environment("development").unwrap(),
            Environment::Development
        );
        assert_eq!(parse_environment("test").unwrap(), Environment::Test);
        assert_eq!(
            parse_environment("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn parse_environment_unknown_fails() {
        let err = parse_environment("staging").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SERPWATCH_ENV")
        );
    }

    #[test]
    fn build_app_config_defaults_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.serpapi_key.is_none());
        assert_eq!(cfg.provider_base_url, "https://serpapi.com/search");
        assert_eq!(cfg.provider_timeout_secs, 15);
        assert_eq!(cfg.page_delay_ms, 500);
        assert_eq!(cfg.default_target_count, 10);
        assert_eq!(cfg.max_target_count, 100);
        assert_eq!(cfg.language, "it");
        assert_eq!(cfg.country, "it");
        assert!(cfg.scoring_enabled);
        assert_eq!(cfg.history_limit, 90);
        assert_eq!(cfg.smtp_server, "smtp.gmail.com");
        assert_eq!(cfg.smtp_port, 587);
        assert!(cfg.sender_email.is_none());
        assert!(cfg.alert_recipients.is_empty());
        assert!(cfg
            .report_path()
            .ends_with("data/serp_monitoring_results.xlsx"));
        assert!(cfg.history_path().ends_with("data/serp_history.json"));
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("SERPAPI_KEY", "secret");
        map.insert("SERPWATCH_PAGE_DELAY_MS", "0");
        map.insert("SERPWATCH_SCORING_ENABLED", "false");
        map.insert("ALERT_EMAIL", "a@example.com, ,b@example.com");
        map.insert("SMTP_PORT", "465");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.serpapi_key.as_deref(), Some("secret"));
        assert_eq!(cfg.page_delay_ms, 0);
        assert!(!cfg.scoring_enabled);
        assert_eq!(cfg.smtp_port, 465);
        assert_eq!(
            cfg.alert_recipients,
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn blank_serpapi_key_is_treated_as_absent() {
        let mut map = HashMap::new();
        map.insert("SERPAPI_KEY", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.serpapi_key.is_none());
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("SERPWATCH_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert_eq!(invalid_var(&result), Some("SERPWATCH_BIND_ADDR"), "got: {result:?}");
    }

    #[test]
    fn build_app_config_fails_with_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("SERPWATCH_PROVIDER_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert_eq!(
            invalid_var(&result),
            Some("SERPWATCH_PROVIDER_TIMEOUT_SECS"),
            "got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_bool() {
        let mut map = HashMap::new();
        map.insert("SERPWATCH_SCORING_ENABLED", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert_eq!(invalid_var(&result), Some("SERPWATCH_SCORING_ENABLED"), "got: {result:?}");
    }

    #[test]
    fn build_app_config_rejects_default_above_max() {
        let mut map = HashMap::new();
        map.insert("SERPWATCH_DEFAULT_TARGET_COUNT", "50");
        map.insert("SERPWATCH_MAX_TARGET_COUNT", "20");
        let result = build_app_config(lookup_from_map(&map));
        assert_eq!(invalid_var(&result), Some("SERPWATCH_DEFAULT_TARGET_COUNT"), "got: {result:?}");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map = HashMap::new();
        map.insert("SERPAPI_KEY", "top-secret-key");
        map.insert("SENDER_PASSWORD", "hunter2");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("top-secret-key"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn split_recipients_drops_blanks() {
        assert_eq!(
            split_recipients(" x@y.com ,,z@y.com "),
            vec!["x@y.com".to_string(), "z@y.com".to_string()]
        );
        assert!(split_recipients("").is_empty());
    }
}
