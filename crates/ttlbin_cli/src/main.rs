//! Command-line client for the ttlbin API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::Value;
use std::io::{self, Read};
use std::time::{Duration, Instant};
use ttlbin_core::{CreatePasteRequest, CreatePasteResponse, PasteResponse, DEFAULT_CLI_SERVER_URL};

#[derive(Parser)]
#[command(name = "tbin", about = "ttlbin CLI", version)]
struct Cli {
    /// Server URL (can also be set via TBIN_SERVER env var)
    #[arg(short, long, env = "TBIN_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a paste from a file or stdin
    New {
        #[arg(short, long)]
        file: Option<String>,
        /// Seconds until the paste expires
        #[arg(long)]
        ttl: Option<i64>,
        /// Number of reads before the paste disappears
        #[arg(short, long)]
        max_views: Option<i64>,
    },
    /// Print a paste (counts as a view)
    Get { id: String },
    /// Check that the server and its storage respond
    Health,
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

fn fail(action: &str, message: impl std::fmt::Display) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn create_request(content: String, ttl: Option<i64>, max_views: Option<i64>) -> CreatePasteRequest {
    CreatePasteRequest {
        content,
        ttl_seconds: ttl,
        max_views,
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_new_output(created: &CreatePasteResponse, json: bool) -> Result<String, String> {
    if json {
        return pretty(created);
    }
    Ok(format!("Created: {}\n{}", created.id, created.url))
}

fn format_get_output(paste: &PasteResponse, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }
    Ok(paste.content.clone())
}

/// Interpret a `/healthz` body.
///
/// # Returns
/// `Some(ok)` when the body carries a boolean `ok` field.
fn health_status(body: &Value) -> Option<bool> {
    body.get("ok").and_then(Value::as_bool)
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    api_url(server, segments).unwrap_or_else(|message| fail(action, message))
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn read_content(file: Option<String>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn print_or_exit(action: &str, output: Result<String, String>) {
    match output {
        Ok(output) => println!("{}", output),
        Err(message) => fail(action, message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::New {
            file,
            ttl,
            max_views,
        } => {
            let endpoint = api_url_or_exit(&server, "New", &["api", "pastes"]);
            let content = read_content(file)?;
            let body = create_request(content, ttl, max_views);

            let request_start = Instant::now();
            let res = client.post(endpoint).json(&body).send().await?;
            log_timing(timing, "new", request_start.elapsed());
            let res = ensure_success_or_exit(res, "New").await;

            let created: CreatePasteResponse = res.json().await?;
            print_or_exit("New", format_new_output(&created, json));
        }
        Commands::Get { id } => {
            let endpoint = api_url_or_exit(&server, "Get", &["api", "pastes", id.as_str()]);
            let request_start = Instant::now();
            let res = client.get(endpoint).send().await?;
            log_timing(timing, "get", request_start.elapsed());
            let res = ensure_success_or_exit(res, "Get").await;

            let paste: PasteResponse = res.json().await?;
            print_or_exit("Get", format_get_output(&paste, json));
        }
        Commands::Health => {
            let endpoint = api_url_or_exit(&server, "Health", &["healthz"]);
            let request_start = Instant::now();
            let res = client.get(endpoint).send().await?;
            log_timing(timing, "health", request_start.elapsed());

            let status = res.status();
            let body: Value = res.json().await.unwrap_or(Value::Null);
            if json {
                println!("{}", pretty(&body).unwrap_or_else(|message| fail("Health", message)));
            }
            match health_status(&body) {
                Some(true) if status.is_success() => {
                    if !json {
                        println!("ok");
                    }
                }
                _ => fail("Health", format!("server reported unhealthy ({})", status)),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
