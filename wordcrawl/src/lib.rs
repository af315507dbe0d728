pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlOverrides, OutputFormat, apply_overrides, describe_configuration, expand_path,
    load_urls_from_file, parse_url_line, render_json, render_text, write_output,
};
