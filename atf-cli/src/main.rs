//! Command-line interface for atf
//! Parses single transliteration lines, or scans whole ATF files and reports what failed.
//!
//! Usage:
//!   atf parse `<line>` [--corpus `<name>`] [--language `<code>`] [--format json|simple]
//!   atf scan `<file>`... [--corpus `<name>`] [--top `<n>`] [--format json|simple]
//!   atf corpora
//!
//! Every subcommand accepts `--config <file>` to layer a TOML file over the built-in
//! corpus profiles. Diagnostics go to stderr; set RUST_LOG for more of them.

use atf::atf::corpus::{scan_documents, ScanReport};
use atf::atf::language;
use atf::parse_transliteration;
use atf_config::{AtfConfig, CorpusProfile, Loader};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};
use std::collections::BTreeMap;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = build_cli().get_matches();
    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(&config, sub),
        Some(("scan", sub)) => handle_scan_command(&config, sub),
        Some(("corpora", _)) => handle_corpora_command(&config),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn build_cli() -> Command {
    let corpus = Arg::new("corpus")
        .long("corpus")
        .short('c')
        .help("Corpus profile selecting the dialect (see `atf corpora`)");
    let format = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["simple", "json"])
        .default_value("simple");

    Command::new("atf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing ATF cuneiform transliterations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("TOML file layered over the built-in configuration"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse one transliteration line")
                .arg(
                    Arg::new("line")
                        .help("The line, without its label")
                        .required(true)
                        .allow_hyphen_values(true)
                        .index(1),
                )
                .arg(corpus.clone())
                .arg(
                    Arg::new("language")
                        .long("language")
                        .short('l')
                        .help("Language the line starts in, as a code or tag (e.g. 'a', 'sux')"),
                )
                .arg(format.clone()),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan ATF files, skipping and reporting malformed lines")
                .arg(
                    Arg::new("files")
                        .help("ATF files to scan")
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append),
                )
                .arg(corpus)
                .arg(
                    Arg::new("top")
                        .long("top")
                        .short('n')
                        .help("How many of the most frequent graphemes to list")
                        .value_parser(value_parser!(usize))
                        .default_value("20"),
                )
                .arg(format),
        )
        .subcommand(Command::new("corpora").about("List the configured corpus profiles"))
}

fn load_config(path: Option<&String>) -> AtfConfig {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let config = loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    debug!("{} corpus profiles configured", config.corpora.len());
    config
}

fn select_profile<'a>(config: &'a AtfConfig, matches: &ArgMatches) -> &'a CorpusProfile {
    let name = matches.get_one::<String>("corpus").map(String::as_str);
    config.profile_or_default(name).unwrap_or_else(|e| {
        eprintln!("Unknown corpus: {}", e);
        eprintln!("\nAvailable corpora:");
        for name in config.corpora.keys() {
            eprintln!("  {}", name);
        }
        std::process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(config: &AtfConfig, matches: &ArgMatches) {
    let profile = select_profile(config, matches);
    let line = matches
        .get_one::<String>("line")
        .expect("line is required");
    let language = match matches.get_one::<String>("language") {
        Some(code) => language::resolve(code).unwrap_or_else(|| {
            eprintln!("Unknown language code: {}", code);
            std::process::exit(1);
        }),
        None => config.language_for(profile),
    };
    let format = matches.get_one::<String>("format").unwrap();

    let occurrences =
        parse_transliteration(line, language, &profile.grammar()).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });

    let formatted = match format.as_str() {
        "json" => serde_json::to_string_pretty(&occurrences).unwrap_or_else(|e| {
            eprintln!("Error formatting occurrences: {}", e);
            std::process::exit(1);
        }),
        _ => occurrences
            .iter()
            .map(|occurrence| occurrence.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    println!("{}", formatted);
}

/// Handle the scan command
fn handle_scan_command(config: &AtfConfig, matches: &ArgMatches) {
    let profile = select_profile(config, matches);
    let top = *matches.get_one::<usize>("top").unwrap();
    let format = matches.get_one::<String>("format").unwrap();

    let documents: Vec<(String, String)> = matches
        .get_many::<String>("files")
        .expect("files are required")
        .map(|path| {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Cannot read {}: {}", path, e);
                std::process::exit(1);
            });
            (path.clone(), text)
        })
        .collect();
    info!("scanning {} files", documents.len());

    let report = scan_documents(&documents, &profile.grammar());
    let formatted = match format.as_str() {
        "json" => format_scan_json(&report, top),
        _ => format_scan_simple(&report, top),
    };
    print!("{}", formatted);
}

fn format_scan_json(report: &ScanReport, top: usize) -> String {
    let errors: BTreeMap<&str, usize> = report
        .errors_by_category()
        .into_iter()
        .map(|(category, failures)| (category, failures.len()))
        .collect();
    let value = serde_json::json!({
        "lines_parsed": report.lines_parsed,
        "lines_skipped": report.failures.len(),
        "errors_by_category": errors,
        "failures": report.failures,
        "issues": report.issues,
        "top": report.top(top),
    });
    let mut json = serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
        eprintln!("Error formatting report: {}", e);
        std::process::exit(1);
    });
    json.push('\n');
    json
}

fn format_scan_simple(report: &ScanReport, top: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Lines parsed: {}, skipped: {}\n",
        report.lines_parsed,
        report.failures.len()
    ));

    let groups = report.errors_by_category();
    if !groups.is_empty() {
        out.push_str("\nErrors by category:\n");
        for (category, failures) in &groups {
            out.push_str(&format!("  {}: {}\n", category, failures.len()));
        }
        out.push_str("\nSkipped lines:\n");
        for failure in &report.failures {
            out.push_str(&format!("  {}\n", failure));
        }
    }

    if !report.issues.is_empty() {
        out.push_str("\nLabel issues:\n");
        for issue in &report.issues {
            out.push_str(&format!("  {}\n", issue));
        }
    }

    let frequent = report.top(top);
    if !frequent.is_empty() {
        out.push_str("\nMost frequent graphemes:\n");
        for (text, count) in frequent {
            out.push_str(&format!("  {}\t{}\n", text, count));
        }
    }
    out
}

/// Handle the corpora command
fn handle_corpora_command(config: &AtfConfig) {
    println!("Available corpus profiles:\n");
    for (name, profile) in &config.corpora {
        let marker = if *name == config.default_corpus {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}", name, marker);
        println!("    {}", profile.description);
        println!("    language: {}", config.language_for(profile));
        println!("    extensions: {}", describe_extensions(profile));
        println!();
    }
}

fn describe_extensions(profile: &CorpusProfile) -> String {
    let extensions = profile.extensions;
    let enabled: Vec<&str> = [
        (extensions.unicode, "unicode"),
        (extensions.em_dash, "em-dash"),
        (extensions.dot_as_delimiter, "dot-as-delimiter"),
        (extensions.plus_as_delimiter, "plus-as-delimiter"),
        (extensions.dishless_numbers, "dishless-numbers"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| name)
    .collect();
    if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    }
}
