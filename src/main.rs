//! Resolve a single message from a directory of message bundles.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use i18n_message_resolver::config::ConfigManager;
use i18n_message_resolver::interpolate::Bindings;
use i18n_message_resolver::locale::{
    Locale,
    fallback_chain,
    parse_locale,
};
use i18n_message_resolver::resolver::MessageResolver;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Resolve a message by key and locale, then interpolate `${...}` expressions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding `.i18n-messages.json` and the message bundles
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Most specific locale to resolve for (e.g. `pt-BR`)
    #[arg(long, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Binding for interpolation as `NAME=VALUE` (VALUE is parsed as JSON when possible)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, Value)>,

    /// Print nothing instead of failing when the key is missing
    #[arg(long)]
    optional: bool,

    /// Message key
    key: String,
}

/// `NAME=VALUE` を束縛に変換する
fn parse_binding(raw: &str) -> Result<(String, Value), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("binding name is empty in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.trim().to_string(), value))
}

/// 解決したメッセージを返す（`--optional` で見つからなければ `None`）
fn run(cli: Cli) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut config = ConfigManager::new();
    config.load_settings(Some(cli.dir))?;

    let resolver = MessageResolver::from_config(&config)?;
    let chain = fallback_chain(cli.locale.as_ref());
    let bindings: Bindings = cli.bindings.into_iter().collect();

    Ok(resolver.resolve(&cli.key, &chain, &bindings, !cli.optional)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(message) => {
            if let Some(message) = message {
                let mut stdout = std::io::stdout().lock();
                if writeln!(stdout, "{message}").is_err() {
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(std::io::stderr(), "error: {error}");
            ExitCode::FAILURE
        }
    }
}
