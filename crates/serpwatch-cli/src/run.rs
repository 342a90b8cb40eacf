//! Foreground monitoring run.

use clap::Args;
use serpwatch_core::{
    load_keywords, AppConfig, JobRequest, KeywordSummary, KeywordsFile, Recipients, Source,
    TimeFilter,
};
use serpwatch_monitor::{Monitor, StatusStore};

/// Arguments for `run`. Anything left unset falls back to the keywords file.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Keyword to monitor; repeat for several. Defaults to the keywords file
    #[arg(long, short = 'k')]
    pub keyword: Vec<String>,

    /// Email recipient for the digest; repeat for several
    #[arg(long, short = 'r')]
    pub recipient: Vec<String>,

    /// Restrict organic and news results to the last day, week or month
    #[arg(long)]
    pub time_filter: Option<TimeFilter>,

    /// Results to collect per source
    #[arg(long)]
    pub target_count: Option<i64>,

    /// Restrict results to a domain; repeat for several
    #[arg(long)]
    pub site: Vec<String>,

    /// Also collect image results
    #[arg(long)]
    pub images: bool,

    /// Also collect news results
    #[arg(long)]
    pub news: bool,

    /// Also fetch the AI answer
    #[arg(long)]
    pub ai: bool,
}

/// Run one job to completion and print a per-keyword summary.
///
/// # Errors
///
/// Returns an error if the keywords file is needed but unreadable, the job is
/// invalid, the provider cannot be built, or another run holds the status.
pub(crate) async fn run_monitor(config: &AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let file = if args.keyword.is_empty() {
        Some(load_keywords(&config.keywords_path)?)
    } else {
        None
    };
    let settings = job_request(args, file.as_ref(), &config.alert_recipients)
        .validate(config.default_target_count, config.max_target_count)?;

    let monitor = Monitor::from_config(config, StatusStore::new())?;
    println!(
        "monitoring {} keyword(s), {} results per source",
        settings.keywords.len(),
        settings.target_count
    );

    let outcome = monitor.run(&settings).await?;

    println!("{}", summary_header());
    for summary in &outcome.summaries {
        println!("{}", summary_line(summary));
    }
    println!();

    let report_path = &monitor.options().report_path;
    if outcome.report_written {
        println!("report: {}", report_path.display());
    } else {
        eprintln!("warning: report was not written to {}", report_path.display());
    }
    if outcome.notified {
        println!("digest sent to {} recipient(s)", settings.recipients.len());
    }

    Ok(())
}

/// Merge command line arguments over the keywords file defaults.
pub(crate) fn job_request(
    args: RunArgs,
    file: Option<&KeywordsFile>,
    default_recipients: &[String],
) -> JobRequest {
    let mut request = file
        .map(|f| f.to_job_request(default_recipients))
        .unwrap_or_default();

    if !args.keyword.is_empty() {
        request.keywords = args.keyword;
    }
    if !args.recipient.is_empty() {
        request.recipients = Some(Recipients::Many(args.recipient));
    }
    if args.time_filter.is_some() {
        request.time_filter = args.time_filter;
    }
    if args.target_count.is_some() {
        request.target_count = args.target_count;
    }
    if !args.site.is_empty() {
        request.site_filter = Some(args.site);
    }
    request.include_images |= args.images;
    request.include_news |= args.news;
    request.include_ai |= args.ai;

    request
}

pub(crate) fn summary_header() -> String {
    format!(
        "{:<30}{:>8}{:>8}{:>8}  STATUS",
        "KEYWORD", "GOOGLE", "BING", "SCORE"
    )
}

pub(crate) fn summary_line(summary: &KeywordSummary) -> String {
    let keyword = if summary.keyword.chars().count() > 28 {
        format!("{}..", summary.keyword.chars().take(26).collect::<String>())
    } else {
        summary.keyword.clone()
    };
    let (score, status) = summary.scores.map_or_else(
        || ("-".to_string(), "-".to_string()),
        |card| (format!("{:.1}", card.average), card.status.to_string()),
    );
    format!(
        "{:<30}{:>8}{:>8}{:>8}  {}",
        keyword,
        summary.count(Source::GoogleOrganic),
        summary.count(Source::BingOrganic),
        score,
        status
    )
}
