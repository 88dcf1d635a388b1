use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::Serialize;
use statement_mt::html::translate_html;
use statement_mt::mt::{
    DEFAULT_LIBRETRANSLATE_URL, DEFAULT_SOURCE_LOCALE, DEFAULT_TARGET_LOCALE, LanguagePair,
    LibreTranslateProvider, MachineTranslator, MockMode, MockTranslator, MtError, Translator,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

/// Answer of the `status` subcommand
#[derive(Debug, Serialize)]
struct SupportStatus {
    ready: bool,
    message: String,
}

fn language_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .help("Source language code")
            .default_value(DEFAULT_SOURCE_LOCALE),
        Arg::new("to")
            .long("to")
            .help("Target language code")
            .default_value(DEFAULT_TARGET_LOCALE),
    ]
}

fn cli() -> Command {
    Command::new("statement-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate the prose of HTML problem statements, leaving code and math intact")
        .subcommand_required(true)
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .global(true)
                .help("Use the mock translator instead of LibreTranslate")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .global(true)
                .env("LIBRETRANSLATE_URL")
                .help("LibreTranslate server URL")
                .default_value(DEFAULT_LIBRETRANSLATE_URL),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .global(true)
                .env("LIBRETRANSLATE_API_KEY")
                .hide_env_values(true)
                .help("LibreTranslate API key"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log every skipped node and engine call")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("status")
                .about("Report whether the language pair can be translated")
                .args(language_args()),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate an HTML document from a file or stdin")
                .args(language_args())
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .help("HTML file to read (default: stdin)")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("File to write (default: stdout)")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

/// `--verbose` enables the per-node and per-segment `debug` events
fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Logs go to stderr; stdout is reserved for the document or status JSON
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_provider(matches: &ArgMatches) -> Result<Arc<dyn MachineTranslator>, MtError> {
    if matches.get_flag("mock") {
        return Ok(Arc::new(MockTranslator::new(MockMode::Suffix)));
    }

    let url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(DEFAULT_LIBRETRANSLATE_URL);
    let api_key = matches.get_one::<String>("api-key").cloned();
    Ok(Arc::new(LibreTranslateProvider::new(url, api_key)?))
}

fn language_pair(matches: &ArgMatches) -> LanguagePair {
    let mut pair = LanguagePair::default();
    if let Some(source) = matches.get_one::<String>("from") {
        pair.source = source.clone();
    }
    if let Some(target) = matches.get_one::<String>("to") {
        pair.target = target.clone();
    }
    pair
}

async fn run_status(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pair = language_pair(matches);
    let provider = build_provider(matches)?;

    let status = match Translator::resolve(provider, &pair).await {
        Ok(translator) => SupportStatus {
            ready: true,
            message: format!(
                "Translation support for {} is ready ({}).",
                pair,
                translator.provider_name()
            ),
        },
        Err(MtError::TranslatorUnavailable(_)) => SupportStatus {
            ready: false,
            message: format!("Translation support for {} is not installed yet.", pair),
        },
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}

async fn run_translate(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let pair = language_pair(matches);
    let provider = build_provider(matches)?;
    let translator = Translator::resolve(provider, &pair).await?;

    let html = match matches.get_one::<PathBuf>("input") {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let translated = translate_html(&html, &translator).await?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => tokio::fs::write(path, translated).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(translated.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("status", sub)) => {
            init_tracing(sub.get_flag("verbose"));
            run_status(sub).await
        }
        Some(("translate", sub)) => {
            init_tracing(sub.get_flag("verbose"));
            run_translate(sub).await
        }
        _ => Err("No subcommand given".into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_language_defaults() {
        let matches = cli().get_matches_from(["statement-mt", "status"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(language_pair(sub), LanguagePair::new("en", "zh"));
    }

    #[test]
    fn test_translate_flags() {
        let matches = cli().get_matches_from([
            "statement-mt",
            "translate",
            "--from",
            "en",
            "--to",
            "fr",
            "--mock",
            "-i",
            "statement.html",
        ]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "translate");
        assert!(sub.get_flag("mock"));
        assert_eq!(language_pair(sub), LanguagePair::new("en", "fr"));
        assert_eq!(
            sub.get_one::<PathBuf>("input"),
            Some(&PathBuf::from("statement.html"))
        );
    }

    #[test]
    fn test_verbose_raises_log_level_to_debug() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");

        let matches = cli().get_matches_from(["statement-mt", "translate", "-v"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(default_log_level(sub.get_flag("verbose")), "debug");
    }

    #[test]
    fn test_status_json_shape() {
        let status = SupportStatus {
            ready: false,
            message: "not installed".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"ready":false,"message":"not installed"}"#
        );
    }
}
