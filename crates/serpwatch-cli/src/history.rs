use serpwatch_core::{AppConfig, Source};
use serpwatch_report::{load_history, HistoryEntry};

/// Print the most recent `limit` runs, newest first.
///
/// # Errors
///
/// Returns an error if the history log exists but cannot be read or parsed.
pub(crate) fn run_history(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let path = config.history_path();
    let entries = load_history(&path)?;

    if entries.is_empty() {
        println!(
            "no runs recorded in {}; run `serpwatch-cli run` first",
            path.display()
        );
        return Ok(());
    }

    for line in history_lines(&entries, limit) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn history_lines(entries: &[HistoryEntry], limit: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<18}{:<30}{:>8}{:>8}{:>8}  STATUS",
        "RUN", "KEYWORD", "GOOGLE", "BING", "SCORE"
    )];

    for entry in entries.iter().rev().take(limit) {
        let when = entry.timestamp.format("%Y-%m-%d %H:%M").to_string();
        for row in &entry.summaries {
            let count = |source: Source| {
                row.sources
                    .iter()
                    .find(|s| s.source == source)
                    .map_or(0, |s| s.count)
            };
            let score = row
                .average_score
                .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"));
            let status = row
                .status
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            lines.push(format!(
                "{:<18}{:<30}{:>8}{:>8}{:>8}  {}",
                when,
                row.keyword,
                count(Source::GoogleOrganic),
                count(Source::BingOrganic),
                score,
                status
            ));
        }
    }

    lines
}
