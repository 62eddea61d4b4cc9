use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    command!("hopmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hopmap")
        .styles(CLAP_STYLING)
        .about(
            "Breadth-first site mapper. Crawls outward from a seed URL and \
            reports every discovered page grouped by its hop distance.",
        )
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The seed URL to crawl outward from (a bare hostname is assumed http)"),
        )
        .arg(
            arg!(-a --"user-agent" <AGENT>)
                .required(false)
                .help("Robots user-agent token used for rule matching")
                .default_value("*"),
        )
        .arg(
            arg!(-d --"delay-ms" <MILLIS>)
                .required(false)
                .help("Politeness pause before each newly scheduled link, in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("1000"),
        )
        .arg(
            arg!(--"max-depth" <LEVELS>)
                .required(false)
                .help("Stop scheduling links beyond this hop distance (default: unbounded)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-pages" <COUNT>)
                .required(false)
                .help("Stop scheduling once this many pages are discovered (default: unbounded)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"same-origin")
                .required(false)
                .help("Only follow links on the seed's origin")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
}
