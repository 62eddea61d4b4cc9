//! Report types and rendering for a finished crawl.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// The outcome of one crawl run: every discovered URL grouped by its hop
/// distance from the seed, ascending, in discovery order within each level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: String,
    pub user_agent: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub levels: BTreeMap<usize, Vec<String>>,
}

impl CrawlReport {
    pub fn total_pages(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    /// Deepest level reached, or `None` for an empty crawl.
    pub fn max_level(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

pub fn generate_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Seed: {}\n", report.seed));
    out.push_str(&format!("  User-agent: {}\n", report.user_agent));
    out.push_str(&format!("  Started: {}\n", format_timestamp(report.started_at)));
    out.push_str(&format!("  Finished: {}\n", format_timestamp(report.finished_at)));
    out.push_str(&format!("  Pages discovered: {}\n", report.total_pages()));
    if let Some(depth) = report.max_level() {
        out.push_str(&format!("  Deepest level: {}\n", depth));
    }

    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for (level, urls) in &report.levels {
        out.push_str(&format!("## Level {}\n", level));
        out.push_str(&format!("  {} URLs\n\n", urls.len()));
        for url in urls {
            out.push_str(&format!("  - {}\n", url));
        }
        out.push('\n');
    }

    out
}

pub fn generate_json_report(report: &CrawlReport) -> Result<String> {
    let wrapped = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    });
    Ok(serde_json::to_string_pretty(&wrapped)?)
}

pub fn save_report(content: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::DateTime;
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("@{}", timestamp))
}
