use std::io::Write;

use super::*;

fn parse(yaml: &str) -> KeywordsFile {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn minimal_file_uses_defaults() {
    let file = parse("keywords:\n  - Acme Corp\n");
    assert_eq!(file.keywords, vec!["Acme Corp".to_string()]);
    assert!(file.recipients.is_empty());
    assert_eq!(file.time_filter, TimeFilter::None);
    assert!(file.target_count.is_none());
    assert!(!file.include_news);
    assert!(validate_keywords(&file).is_ok());
}

#[test]
fn full_file_parses() {
    let file = parse(
        r"
keywords:
  - Acme Corp
  - Acme Spa
recipients: [ops@example.com]
site_filter: [example.com]
time_filter: week
target_count: 20
include_images: true
include_news: true
include_ai: false
",
    );
    assert_eq!(file.keywords.len(), 2);
    assert_eq!(file.time_filter, TimeFilter::Week);
    assert_eq!(file.target_count, Some(20));
    assert!(file.include_images);
    assert!(validate_keywords(&file).is_ok());
}

#[test]
fn rejects_empty_list() {
    let file = parse("keywords: []\n");
    assert!(matches!(
        validate_keywords(&file),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn rejects_blank_keyword() {
    let file = parse("keywords:\n  - Acme\n  - '   '\n");
    assert!(validate_keywords(&file).is_err());
}

#[test]
fn rejects_case_insensitive_duplicates() {
    let file = parse("keywords:\n  - Acme Corp\n  - acme corp\n");
    let err = validate_keywords(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate keyword"));
}

#[test]
fn job_request_merges_recipients() {
    let file = parse("keywords: [Acme]\nrecipients: [a@x.com, b@x.com]\ntarget_count: 5\n");
    let req = file.to_job_request(&["B@x.com".to_string(), "c@x.com".to_string()]);
    let settings = req.validate(10, 100).unwrap();
    assert_eq!(
        settings.recipients,
        vec![
            "B@x.com".to_string(),
            "c@x.com".to_string(),
            "a@x.com".to_string()
        ]
    );
    assert_eq!(settings.target_count, 5);
}

#[test]
fn load_keywords_reads_and_validates_file() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    writeln!(tmp, "keywords:\n  - Acme Corp").unwrap();
    let file = load_keywords(tmp.path()).unwrap();
    assert_eq!(file.keywords, vec!["Acme Corp".to_string()]);
}

#[test]
fn load_keywords_missing_file_is_io_error() {
    let err = load_keywords(Path::new("/nonexistent/keywords.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::KeywordsFileIo { .. }));
}
