use chrono::{TimeZone, Utc};
use clap::Parser;
use serpwatch_core::{
    KeywordSummary, KeywordsFile, Recipients, ReputationStatus, ScoreCard, Source,
    SourceBreakdown, TimeFilter,
};
use serpwatch_report::HistoryEntry;

use super::*;
use crate::history::history_lines;
use crate::run::{job_request, summary_header, summary_line};

fn parse_run(args: &[&str]) -> RunArgs {
    let mut argv = vec!["serpwatch-cli", "run"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("expected valid cli args").command {
        Commands::Run(args) => args,
        Commands::History { .. } => panic!("expected run command"),
    }
}

fn summary(
    keyword: &str,
    google: usize,
    bing: usize,
    scores: Option<ScoreCard>,
) -> KeywordSummary {
    let breakdown = |source, count| SourceBreakdown {
        source,
        count,
        score: None,
        top_five: None,
        results: Vec::new(),
    };
    KeywordSummary {
        keyword: keyword.to_string(),
        per_source: vec![
            breakdown(Source::GoogleOrganic, google),
            breakdown(Source::BingOrganic, bing),
        ],
        scores,
        news: None,
        images: None,
        ai_answer: None,
        timestamp: Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap(),
    }
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["serpwatch-cli"]).is_err());
}

#[test]
fn parses_run_with_repeated_flags() {
    let args = parse_run(&[
        "--keyword",
        "Acme Corp",
        "-k",
        "Acme Group",
        "--recipient",
        "a@acme.it",
        "--time-filter",
        "week",
        "--target-count",
        "25",
        "--site",
        "acme.it",
        "--news",
        "--ai",
    ]);

    assert_eq!(args.keyword, vec!["Acme Corp", "Acme Group"]);
    assert_eq!(args.recipient, vec!["a@acme.it"]);
    assert_eq!(args.time_filter, Some(TimeFilter::Week));
    assert_eq!(args.target_count, Some(25));
    assert_eq!(args.site, vec!["acme.it"]);
    assert!(args.news && args.ai && !args.images);
}

#[test]
fn rejects_unknown_time_filter() {
    assert!(Cli::try_parse_from(["serpwatch-cli", "run", "--time-filter", "year"]).is_err());
}

#[test]
fn parses_history_limit_with_default() {
    let cli = Cli::try_parse_from(["serpwatch-cli", "history"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::History { limit: 10 }));

    let cli = Cli::try_parse_from(["serpwatch-cli", "history", "--limit", "3"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::History { limit: 3 }));
}

#[test]
fn job_request_uses_explicit_keywords_without_file() {
    let request = job_request(parse_run(&["-k", "Acme", "--images"]), None, &[]);

    assert_eq!(request.keywords, vec!["Acme"]);
    assert!(request.include_images);
    assert!(request.recipients.is_none());
    assert!(request.target_count.is_none());
}

#[test]
fn job_request_overrides_file_defaults() {
    let file = KeywordsFile {
        keywords: vec!["Acme Corp".to_string()],
        recipients: vec!["brand@acme.it".to_string()],
        site_filter: vec!["acme.it".to_string()],
        time_filter: TimeFilter::Month,
        target_count: Some(30),
        include_news: true,
        ..KeywordsFile::default()
    };
    let defaults = vec!["ops@acme.it".to_string()];

    let untouched = job_request(parse_run(&[]), Some(&file), &defaults);
    assert_eq!(untouched.keywords, vec!["Acme Corp"]);
    assert_eq!(
        untouched.recipients,
        Some(Recipients::Many(vec![
            "ops@acme.it".to_string(),
            "brand@acme.it".to_string()
        ]))
    );
    assert_eq!(untouched.time_filter, Some(TimeFilter::Month));
    assert_eq!(untouched.target_count, Some(30));
    assert!(untouched.include_news);

    let overridden = job_request(
        parse_run(&["--time-filter", "day", "--target-count", "5", "-r", "x@acme.it"]),
        Some(&file),
        &defaults,
    );
    assert_eq!(overridden.time_filter, Some(TimeFilter::Day));
    assert_eq!(overridden.target_count, Some(5));
    assert_eq!(
        overridden.recipients,
        Some(Recipients::Many(vec!["x@acme.it".to_string()]))
    );
    assert_eq!(overridden.site_filter, Some(vec!["acme.it".to_string()]));
}

#[test]
fn summary_line_shows_counts_and_score() {
    let scored = summary(
        "Acme Corp",
        15,
        12,
        Some(ScoreCard {
            average: 42.5,
            status: ReputationStatus::Warning,
        }),
    );
    let line = summary_line(&scored);
    assert!(line.starts_with("Acme Corp"));
    assert!(line.contains("15"));
    assert!(line.contains("12"));
    assert!(line.contains("42.5"));
    assert!(line.ends_with("WARNING"));
    assert_eq!(line.len(), summary_header().len() + 1);
}

#[test]
fn summary_line_without_scores_uses_dashes() {
    let line = summary_line(&summary("Acme", 0, 0, None));
    assert!(line.ends_with("-  -"));
}

#[test]
fn summary_line_truncates_long_keywords() {
    let long = "a".repeat(40);
    let line = summary_line(&summary(&long, 1, 1, None));
    assert!(line.starts_with(&format!("{}..", "a".repeat(26))));
}

#[test]
fn history_lines_are_newest_first_and_limited() {
    let older = HistoryEntry::from_summaries(
        Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap(),
        &[summary("old", 1, 1, None)],
    );
    let newer = HistoryEntry::from_summaries(
        Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap(),
        &[summary("new", 15, 15, None)],
    );
    let entries = vec![older, newer];

    let lines = history_lines(&entries, 10);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("RUN"));
    assert!(lines[1].starts_with("2025-03-07 09:00"));
    assert!(lines[1].contains("new"));
    assert!(lines[2].contains("old"));

    let limited = history_lines(&entries, 1);
    assert_eq!(limited.len(), 2);
    assert!(limited[1].contains("new"));
}
