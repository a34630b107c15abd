//! fetch-loader
//!
//! Issues a single request task from the command line and prints the
//! decoded payload.
//!
//! ```text
//! fetch-loader <url> [-X METHOD] [-H "Name: value"]... [-d BODY]
//!              [--timeout-ms N] [--mime-type TYPE] [--timings]
//!              [--abort-after-ms N] [--config PATH]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;

use fetch_loader::config::{load_config, LoaderConfig};
use fetch_loader::decode::{MimeType, Payload};
use fetch_loader::http::{RawResponse, ReqwestTransport};
use fetch_loader::loader::{LoaderOptions, RequestTask};
use fetch_loader::observability::logging;

#[derive(Parser)]
#[command(name = "fetch-loader")]
#[command(about = "Issue a cancellable, deadline-bounded HTTP request", long_about = None)]
struct Cli {
    /// Target URL
    url: String,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as "Name: value", repeatable
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Overall deadline in milliseconds, 0 disables it
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Force the decode target (e.g. application/json, text/plain, raw)
    #[arg(long)]
    mime_type: Option<MimeType>,

    /// Print lifecycle timings
    #[arg(long)]
    timings: bool,

    /// Abort the request after this many milliseconds
    #[arg(long)]
    abort_after_ms: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoaderConfig::default(),
    };
    logging::init(&config.observability)?;

    let transport = ReqwestTransport::from_config(&config.transport)?;
    let options = build_options(&cli, &config)?;
    let task = RequestTask::with_transport(cli.url.clone(), options, Arc::new(transport));

    tracing::info!(task_id = %task.id(), url = %task.request_url(), "Request task created");
    task.execute();

    if let Some(ms) = cli.abort_after_ms {
        let handle = task.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            handle.abort();
        });
    }

    let outcome = (&task).await;

    if let Some(timings) = task.timings() {
        eprintln!("state: {}", task.state());
        if let Some(duration) = timings.duration() {
            eprintln!("duration: {:?}", duration);
        }
    }

    match outcome {
        Ok(payload) => {
            print_payload(&payload)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {}", err.name(), err.message());
            if let Some(response) = err.response() {
                eprintln!("status: {} {}", response.status().as_u16(), response.status_text());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_options(
    cli: &Cli,
    config: &LoaderConfig,
) -> Result<LoaderOptions, Box<dyn std::error::Error>> {
    let mut options = LoaderOptions::from_defaults(&config.defaults)
        .with_method(Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?);

    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected 'Name: value'", header))?;
        options = options.with_header(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    if let Some(data) = &cli.data {
        options = options.with_body(data.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        options.timeout = Some(Duration::from_millis(ms));
    }
    if let Some(mime_type) = cli.mime_type {
        options = options.with_mime_type(mime_type);
    }
    if cli.timings {
        options = options.with_timings(true);
    }

    Ok(options)
}

fn print_payload(payload: &Payload) -> Result<(), serde_json::Error> {
    match payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{}", text),
        Payload::Document(document) => println!("{}", document.source()),
        Payload::Raw(response) => print_raw(response),
    }
    Ok(())
}

fn print_raw(response: &RawResponse) {
    println!("HTTP {} {}", response.status().as_u16(), response.status_text());
    for (name, value) in response.headers() {
        println!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    println!();
    println!("{}", String::from_utf8_lossy(response.bytes()));
}
