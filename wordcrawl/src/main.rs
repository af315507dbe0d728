use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::Level;
use url::Url;
use wordcrawl::handlers::{
    CrawlOverrides, OutputFormat, apply_overrides, describe_configuration, expand_path,
    render_json, render_text, write_output,
};
use wordcrawl_core::{ConfigurationLoader, ParallelWebCrawler};

mod commands;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_logging(verbose);

    let outcome = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet),
        Some(("check", primary_command)) => handle_check(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn config_path(args: &ArgMatches) -> Result<std::path::PathBuf> {
    args.get_one::<String>("CONFIG")
        .map(|p| expand_path(p))
        .ok_or_else(|| anyhow!("a configuration path is required"))
}

fn handle_crawl(args: &ArgMatches, quiet: bool) -> Result<()> {
    let config_path = config_path(args)?;
    let overrides = CrawlOverrides {
        urls: args
            .get_many::<Url>("url")
            .map(|urls| urls.cloned().collect())
            .unwrap_or_default(),
        urls_file: args.get_one::<String>("urls-file").map(|p| expand_path(p)),
        max_depth: args.get_one::<usize>("depth").copied(),
        timeout_seconds: args.get_one::<u64>("timeout").copied(),
        parallelism: args.get_one::<usize>("parallelism").copied(),
        popular_word_count: args.get_one::<usize>("popular-words").copied(),
        output: args.get_one::<String>("output").map(|p| expand_path(p)),
    };
    let format = args
        .get_one::<String>("format")
        .and_then(|f| OutputFormat::from_str(f))
        .unwrap_or(OutputFormat::Text);

    let builder = ConfigurationLoader::new(&config_path)
        .load_builder()
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let config = apply_overrides(builder, &overrides)?
        .build()
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    let crawler = ParallelWebCrawler::from_config(config)?;
    let seeds = crawler.config().starting_urls();

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!(
            "Crawling {} seed URL(s) with {} worker(s)...",
            seeds.len(),
            crawler.pool_size()
        ));
        Some(pb)
    };

    let result = crawler.crawl(seeds);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
        eprintln!(
            "{} Crawl complete! {} pages visited",
            "✓".green().bold(),
            result.urls_visited()
        );
    }

    let report = match format {
        OutputFormat::Text => render_text(&result),
        OutputFormat::Json => render_json(&result)?,
    };
    write_output(&report, crawler.config().result_path())
}

fn handle_check(args: &ArgMatches) -> Result<()> {
    let config_path = config_path(args)?;
    let config = ConfigurationLoader::new(&config_path)
        .load()
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    println!(
        "{} {} is valid",
        "✓".green().bold(),
        config_path.display().to_string().bright_white()
    );
    print!("{}", describe_configuration(&config));
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
