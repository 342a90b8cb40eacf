//! Job requests as accepted by the trigger surfaces, and their validated form.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::split_recipients;
use crate::ConfigError;

/// Recency restriction applied to organic and news queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    None,
    Day,
    Week,
    Month,
}

impl FromStr for TimeFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(TimeFilter::None),
            "day" | "d" => Ok(TimeFilter::Day),
            "week" | "w" => Ok(TimeFilter::Week),
            "month" | "m" => Ok(TimeFilter::Month),
            other => Err(ConfigError::InvalidJob(format!(
                "unknown time filter \"{other}\"; expected none, day, week or month"
            ))),
        }
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFilter::None => write!(f, "none"),
            TimeFilter::Day => write!(f, "day"),
            TimeFilter::Week => write!(f, "week"),
            TimeFilter::Month => write!(f, "month"),
        }
    }
}

/// Recipients arrive either as one (possibly comma-separated) string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Recipients::One(raw) => split_recipients(&raw),
            Recipients::Many(list) => list
                .iter()
                .flat_map(|entry| split_recipients(entry))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recipients: Option<Recipients>,
    #[serde(default)]
    pub time_filter: Option<TimeFilter>,
    #[serde(default)]
    pub target_count: Option<i64>,
    #[serde(default)]
    pub site_filter: Option<Vec<String>>,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub include_news: bool,
    #[serde(default, rename = "includeAI", alias = "includeAi")]
    pub include_ai: bool,
}

/// A validated job, ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSettings {
    pub keywords: Vec<String>,
    pub recipients: Vec<String>,
    pub time_filter: TimeFilter,
    pub target_count: usize,
    pub site_filter: Vec<String>,
    pub include_images: bool,
    pub include_news: bool,
    pub include_ai: bool,
}

impl JobRequest {
    /// Validate the request against the configured target-count bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidJob`] when no usable keyword remains.
    pub fn validate(
        self,
        default_target_count: usize,
        max_target_count: usize,
    ) -> Result<JobSettings, ConfigError> {
        let keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if keywords.is_empty() {
            return Err(ConfigError::InvalidJob(
                "at least one non-blank keyword is required".to_string(),
            ));
        }

        let max = max_target_count.max(1);
        let target_count = match self.target_count {
            None => default_target_count.clamp(1, max),
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
        };

        let mut seen = HashSet::new();
        let site_filter = self
            .site_filter
            .unwrap_or_default()
            .iter()
            .filter_map(|d| normalize_domain(d))
            .filter(|d| seen.insert(d.clone()))
            .collect();

        Ok(JobSettings {
            keywords,
            recipients: self.recipients.map(Recipients::into_list).unwrap_or_default(),
            time_filter: self.time_filter.unwrap_or_default(),
            target_count,
            site_filter,
            include_images: self.include_images,
            include_news: self.include_news,
            include_ai: self.include_ai,
        })
    }
}

/// Reduce a user-supplied site to a bare host: no scheme, path or trailing dot.
///
/// Returns `None` for blank input.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_ascii_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(keywords: &[&str]) -> JobRequest {
        JobRequest {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            ..JobRequest::default()
        }
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "keywords": ["Acme Corp"],
            "recipients": "a@x.com, b@x.com",
            "timeFilter": "week",
            "targetCount": 25,
            "siteFilter": ["https://www.Example.com/news/"],
            "includeImages": true,
            "includeAI": true
        }"#;
        let req: JobRequest = serde_json::from_str(json).unwrap();
        let settings = req.validate(10, 100).unwrap();
        assert_eq!(settings.keywords, vec!["Acme Corp".to_string()]);
        assert_eq!(settings.recipients.len(), 2);
        assert_eq!(settings.time_filter, TimeFilter::Week);
        assert_eq!(settings.target_count, 25);
        assert_eq!(settings.site_filter, vec!["www.example.com".to_string()]);
        assert!(settings.include_images);
        assert!(!settings.include_news);
        assert!(settings.include_ai);
    }

    #[test]
    fn recipients_accept_list() {
        let json = r#"{"keywords": ["a"], "recipients": ["x@y.com", " ", "z@y.com"]}"#;
        let req: JobRequest = serde_json::from_str(json).unwrap();
        let settings = req.validate(10, 100).unwrap();
        assert_eq!(
            settings.recipients,
            vec!["x@y.com".to_string(), "z@y.com".to_string()]
        );
    }

    #[test]
    fn rejects_blank_keywords() {
        let err = request(&["  ", ""]).validate(10, 100).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJob(_)));
        assert!(request(&[]).validate(10, 100).is_err());
    }

    #[test]
    fn trims_keywords_and_keeps_order() {
        let settings = request(&[" b ", "", "a"]).validate(10, 100).unwrap();
        assert_eq!(settings.keywords, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn target_count_defaults_and_clamps() {
        assert_eq!(request(&["a"]).validate(10, 100).unwrap().target_count, 10);

        let mut req = request(&["a"]);
        req.target_count = Some(500);
        assert_eq!(req.validate(10, 100).unwrap().target_count, 100);

        let mut req = request(&["a"]);
        req.target_count = Some(-3);
        assert_eq!(req.validate(10, 100).unwrap().target_count, 1);
    }

    #[test]
    fn site_filter_is_normalized_and_deduplicated() {
        let mut req = request(&["a"]);
        req.site_filter = Some(vec![
            "Example.com".to_string(),
            "http://example.com/".to_string(),
            "  ".to_string(),
            "news.example.org/path?q=1".to_string(),
        ]);
        let settings = req.validate(10, 100).unwrap();
        assert_eq!(
            settings.site_filter,
            vec!["example.com".to_string(), "news.example.org".to_string()]
        );
    }

    #[test]
    fn time_filter_parses_from_str() {
        assert_eq!("Day".parse::<TimeFilter>().unwrap(), TimeFilter::Day);
        assert_eq!("".parse::<TimeFilter>().unwrap(), TimeFilter::None);
        assert!("year".parse::<TimeFilter>().is_err());
    }
}
