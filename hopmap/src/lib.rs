// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{parse_url_arg, render_report, save_rendered_report};

// Re-export the engine surface for consumers of the CLI crate
pub use hopmap_scanner::{CrawlReport, Crawler};
