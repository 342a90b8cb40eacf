use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::job::{JobRequest, Recipients, TimeFilter};
use crate::ConfigError;

/// Keywords and run defaults for scheduled and CLI-triggered runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsFile {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub site_filter: Vec<String>,
    #[serde(default)]
    pub time_filter: TimeFilter,
    pub target_count: Option<usize>,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub include_news: bool,
    #[serde(default)]
    pub include_ai: bool,
}

impl KeywordsFile {
    /// Build a job request from the file, adding `extra_recipients` ahead of
    /// the file's own list.
    #[must_use]
    pub fn to_job_request(&self, extra_recipients: &[String]) -> JobRequest {
        let mut recipients: Vec<String> = extra_recipients.to_vec();
        for r in &self.recipients {
            if !recipients.iter().any(|existing| existing.eq_ignore_ascii_case(r)) {
                recipients.push(r.clone());
            }
        }

        JobRequest {
            keywords: self.keywords.clone(),
            recipients: Some(Recipients::Many(recipients)),
            time_filter: Some(self.time_filter),
            target_count: self
                .target_count
                .map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
            site_filter: Some(self.site_filter.clone()),
            include_images: self.include_images,
            include_news: self.include_news,
            include_ai: self.include_ai,
        }
    }
}

/// Load and validate the keywords file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<KeywordsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: KeywordsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::KeywordsFileParse)?;

    validate_keywords(&file)?;

    Ok(file)
}

fn validate_keywords(file: &KeywordsFile) -> Result<(), ConfigError> {
    if file.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "keywords file must list at least one keyword".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for keyword in &file.keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "keyword must be non-empty".to_string(),
            ));
        }
        if !seen.insert(keyword.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{keyword}'"
            )));
        }
    }

    if file.target_count == Some(0) {
        return Err(ConfigError::Validation(
            "target_count must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "keywords_test.rs"]
mod tests;
