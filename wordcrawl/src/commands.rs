use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("wordcrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wordcrawl")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Only print the result, no progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every visited page to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("crawl")
                .about("Crawl from the configured seed URLs and report the most popular words")
                .arg(
                    arg!(<CONFIG>)
                        .required(true)
                        .help("Path to the JSON crawler configuration"),
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Seed URL to crawl; repeat to add more (replaces the configured seeds)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-H --"urls-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs (replaces the configured seeds)"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum number of link hops to follow")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Stop starting new fetches after this many seconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-t --"parallelism" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of worker threads in the crawl pool.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-n --"popular-words" <COUNT>)
                        .required(false)
                        .help("How many of the most popular words to report")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the result to a file (default: the configured resultPath, or the screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Result format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("check")
                .about("Validate a crawler configuration without crawling")
                .arg(
                    arg!(<CONFIG>)
                        .required(true)
                        .help("Path to the JSON crawler configuration"),
                ),
        )
}
