use anyhow::Context;
use hopmap_scanner::CrawlReport;
use hopmap_scanner::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use std::path::Path;
use url::Url;

/// Normalize a seed argument. Bare hostnames get an `http://` scheme so
/// `hopmap -u example.com` works; anything that still fails to parse as a
/// URL with a host is rejected.
pub fn parse_url_arg(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Some(candidate),
        _ => None,
    }
}

/// Render a finished crawl in the requested format. Unknown formats fall
/// back to text.
pub fn render_report(report: &CrawlReport, format: &str) -> anyhow::Result<String> {
    match ReportFormat::from_str(format) {
        Some(ReportFormat::Json) => {
            generate_json_report(report).context("serializing JSON report")
        }
        Some(ReportFormat::Text) | None => Ok(generate_text_report(report)),
    }
}

/// Write a rendered report to disk, expanding a leading `~`. Returns the
/// expanded path for display.
pub fn save_rendered_report(content: &str, path: &Path) -> anyhow::Result<String> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::tilde(raw.as_ref()).into_owned();
    save_report(content, Path::new(&expanded))
        .with_context(|| format!("writing report to {}", expanded))?;
    Ok(expanded)
}
