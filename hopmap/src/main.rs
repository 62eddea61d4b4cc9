use anyhow::anyhow;
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use hopmap::handlers::{parse_url_arg, render_report, save_rendered_report};
use hopmap_scanner::Crawler;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

mod commands;

const BANNER: &str = r#"
  _
 | |__   ___  _ __  _ __ ___   __ _ _ __
 | '_ \ / _ \| '_ \| '_ ` _ \ / _` | '_ \
 | | | | (_) | |_) | | | | | | (_| | |_) |
 |_| |_|\___/| .__/|_| |_| |_|\__,_| .__/
             |_|                   |_|
"#;

fn print_banner() {
    println!("{}", BANNER.cyan());
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();
    let quiet = matches.get_flag("quiet");

    tracing_subscriber::fmt::init();

    if !quiet {
        print_banner();
    }

    if let Err(e) = run(&matches, quiet).await {
        eprintln!("{} Crawl failed: {}", "✗".red(), e);
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let url_arg = matches.get_one::<String>("url").unwrap();
    let seed = parse_url_arg(url_arg)
        .ok_or_else(|| anyhow!("'{}' is not a usable seed URL", url_arg))?;
    let user_agent = matches.get_one::<String>("user-agent").unwrap();
    let delay_ms = matches.get_one::<u64>("delay-ms").unwrap();
    let timeout = matches.get_one::<u64>("timeout").unwrap();
    let same_origin = matches.get_flag("same-origin");
    let format = matches.get_one::<String>("format").unwrap();
    let output = matches.get_one::<PathBuf>("output");

    if !quiet {
        let host = Url::parse(&seed)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| seed.clone());
        println!("🕷  Crawling {}", host);
        println!("Robots agent: {}", user_agent);
        println!("Politeness delay: {}ms\n", delay_ms);
    }

    let mut crawler = Crawler::over_http_with_timeout(*timeout)?
        .with_user_agent(user_agent)
        .with_politeness_delay(Duration::from_millis(*delay_ms))
        .with_same_origin_only(same_origin);

    if let Some(depth) = matches.get_one::<usize>("max-depth") {
        crawler = crawler.with_max_depth(*depth);
    }
    if let Some(pages) = matches.get_one::<usize>("max-pages") {
        crawler = crawler.with_max_pages(*pages);
    }

    // Spinner driven by the crawler's progress callback
    let progress_bar = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    };

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        crawler = crawler.with_progress_callback(Arc::new(move |level, url| {
            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("{} pages processed, level {}: {}", count, level, url));
        }));
    }

    let report = crawler.run(&seed).await?;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let rendered = render_report(&report, format)?;

    match output {
        Some(path) => {
            let saved_to = save_rendered_report(&rendered, path)?;
            if !quiet {
                println!("{} Report saved to {}", "✓".green(), saved_to);
            }
        }
        None => {
            if !quiet {
                println!("\n{} Crawl complete!", "✓".green());
                println!(
                    "  {} pages across {} levels\n",
                    report.total_pages().to_string().green(),
                    report.levels.len().to_string().green()
                );
            }
            print!("{}", rendered);
        }
    }

    Ok(())
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
