use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;

use crate::config::{self, Config};
use crate::contract::ScriptFilterResponse;
use crate::model::ResultItem;
use crate::osascript::OsaScriptSource;
use crate::pipeline::{cache_flushed_item, config_error_item, QueryPipeline};
use crate::source::TabSource;
use crate::{logging, static_cache};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

/// Search browser tabs and spaces, printing a script filter document.
///
/// Options come first; the query follows `--` so any text, flag-like or not,
/// reaches the matcher unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "tabfind", version)]
pub struct CliOptions {
    /// Partial phrase to match; empty lists spaces.
    #[arg(last = true, default_value = "")]
    pub query: String,

    /// Optional TOML file with defaults for the workflow variables.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Delete the cached tab snapshot and exit.
    #[arg(long)]
    pub flush_cache: bool,

    /// Pretty-print the output document.
    #[arg(long)]
    pub pretty: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, clap::Error> {
    CliOptions::try_parse_from(std::iter::once("tabfind".to_string()).chain(args.iter().cloned()))
}

/// Entry point for the binary. A rejected command line still produces a
/// document, with the clap report on stderr.
pub fn run_cli(args: &[String]) -> Result<(), RuntimeError> {
    match parse_cli_args(args) {
        Ok(options) => run_with_options(options),
        Err(error) => {
            eprintln!("[tabfind] {}", error.render());
            emit(&[invocation_error_item(&error)], false)
        }
    }
}

pub fn invocation_error_item(error: &clap::Error) -> ResultItem {
    let subtitle = match error.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::DisplayVersion => "Pass the query after `--`".to_string(),
        _ => error
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    };
    ResultItem::notice("Invalid invocation", &subtitle)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = match config::load(options.config.as_deref(), |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(error) => {
            return emit(&[config_error_item(&error)], options.pretty);
        }
    };

    if let Err(error) = logging::init(&config.cache_dir) {
        eprintln!("[tabfind] logging disabled: {error}");
    }
    tracing::info!(
        query = %options.query,
        use_cache = config.use_cache,
        cache_path = %config.cache_path().display(),
        "invocation"
    );

    let source = OsaScriptSource::new(&config.app_name);
    let items = run_query(&config, &source, &options);
    emit(&items, options.pretty)
}

/// Everything between parsed options and the rendered rows, with the source
/// injected.
pub fn run_query(config: &Config, source: &dyn TabSource, options: &CliOptions) -> Vec<ResultItem> {
    if options.flush_cache {
        let removed = match static_cache::clear(&config.cache_path()) {
            Ok(removed) => removed,
            Err(error) => {
                tracing::warn!(%error, "failed to flush static cache");
                false
            }
        };
        return vec![cache_flushed_item(removed)];
    }

    QueryPipeline::new(config, source).run(&options.query)
}

pub fn render(items: &[ResultItem], pretty: bool) -> Result<String, serde_json::Error> {
    ScriptFilterResponse::from(items.to_vec()).to_json(pretty)
}

fn emit(items: &[ResultItem], pretty: bool) -> Result<(), RuntimeError> {
    let document = render(items, pretty)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{invocation_error_item, parse_cli_args};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn query_defaults_to_empty() {
        let options = parse_cli_args(&[]).unwrap();
        assert_eq!(options.query, "");
        assert!(!options.flush_cache);
    }

    #[test]
    fn parses_query_and_flags() {
        let options =
            parse_cli_args(&args(&["--pretty", "--config", "/tmp/tabfind.toml", "--", "git hub"]))
                .unwrap();
        assert_eq!(options.query, "git hub");
        assert!(options.pretty);
        assert_eq!(
            options.config.as_deref(),
            Some(std::path::Path::new("/tmp/tabfind.toml"))
        );
    }

    #[test]
    fn flag_like_text_after_separator_is_the_query() {
        for query in ["-h", "--help", "--pretty", "--flush-cache", "--bogus"] {
            let options = parse_cli_args(&args(&["--", query])).unwrap();
            assert_eq!(options.query, query);
            assert!(!options.pretty);
            assert!(!options.flush_cache);
        }
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn rejects_query_without_separator() {
        assert!(parse_cli_args(&args(&["recipes"])).is_err());
    }

    #[test]
    fn help_request_becomes_an_error_row() {
        let error = parse_cli_args(&args(&["-h"])).unwrap_err();
        let item = invocation_error_item(&error);
        assert_eq!(item.title, "Invalid invocation");
        assert_eq!(item.subtitle, "Pass the query after `--`");
    }

    #[test]
    fn unknown_flag_error_row_names_the_flag() {
        let error = parse_cli_args(&args(&["--bogus"])).unwrap_err();
        let item = invocation_error_item(&error);
        assert!(item.subtitle.contains("--bogus"), "{}", item.subtitle);
        assert!(!item.subtitle.starts_with("error:"));
    }
}
