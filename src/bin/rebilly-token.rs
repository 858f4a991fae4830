use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rebilly_token::form::FormFields;
use rebilly_token::observability::metrics::get_metrics;
use rebilly_token::transport::ReqwestTransport;
use rebilly_token::utils::config_loader;
use rebilly_token::utils::logging;
use rebilly_token::utils::logging::LogLevel;
use rebilly_token::{Completion, ResultEnvelope, TokenHandler, TokenPayload};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "rebilly-token.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    /// JSON file with structured token data
    #[arg(long, conflicts_with = "form", required_unless_present = "form")]
    payload: Option<String>,
    /// YAML/JSON file with labeled form fields
    #[arg(long)]
    form: Option<String>,
    /// extra token data, `key=value`, value parsed as JSON when possible
    #[arg(long = "extra", value_parser = parse_extra)]
    extra: Vec<(String, Value)>,
    /// print prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned()).await?;

    // -------------------------------
    // 2. Create handler
    // -------------------------------

    let transport = ReqwestTransport::new(service_config.settings.timeout_ms())?;
    let handler = TokenHandler::from_config(&service_config, transport)?;
    info!("handler ready, {} modules", handler.modules().len());

    // -------------------------------
    // 3. Read payload and create token
    // -------------------------------

    let extra_data = (!args.extra.is_empty())
        .then(|| args.extra.iter().cloned().collect::<Map<String, Value>>());

    let (tx, rx) = oneshot::channel::<ResultEnvelope>();
    let callback = move |envelope: ResultEnvelope| {
        let _ = tx.send(envelope);
    };

    let completion = match (&args.payload, &args.form) {
        (Some(path), _) => {
            let content = tokio::fs::read_to_string(path).await
                .with_context(|| format!("cannot read payload {}", path))?;
            let data: Map<String, Value> = serde_json::from_str(&content)?;
            handler.create_token(TokenPayload::Data(data), callback, extra_data).await?
        }
        (None, Some(path)) => {
            let content = tokio::fs::read_to_string(path).await
                .with_context(|| format!("cannot read form {}", path))?;
            let form: FormFields = serde_yaml::from_str(&content)?;
            handler.create_token(TokenPayload::Form(&form), callback, extra_data).await?
        }
        (None, None) => return Err(anyhow!("either --payload or --form is required")),
    };

    // -------------------------------
    // 4. Print result envelope
    // -------------------------------

    let exit = match completion {
        Completion::Rejected(reason) => {
            info!("token request rejected: {:?}", reason);
            ExitCode::FAILURE
        }
        Completion::Submitted => {
            let envelope = rx.await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            if envelope.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
    };

    if args.metrics {
        eprintln!("{}", get_metrics().await.render()?);
    }
    Ok(exit)
}

fn parse_extra(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}
