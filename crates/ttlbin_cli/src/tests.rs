//! Unit tests for the `tbin` CLI entrypoint module.

use super::{
    api_url, create_request, error_message_for_response, format_get_output, format_new_output,
    health_status, normalize_server, resolve_server,
};
use super::{Cli, Commands};
use clap::{CommandFactory, Parser};
use serde_json::json;
use ttlbin_core::env::{env_lock, ScopedEnv};
use ttlbin_core::{CreatePasteResponse, PasteResponse, DEFAULT_CLI_SERVER_URL, DEFAULT_PORT};

#[test]
fn clap_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn new_accepts_limits_and_file() {
    let cli = Cli::try_parse_from([
        "tbin",
        "new",
        "--file",
        "notes.txt",
        "--ttl",
        "60",
        "-m",
        "3",
    ])
    .expect("parse");

    match cli.command {
        Commands::New {
            file,
            ttl,
            max_views,
        } => {
            assert_eq!(file.as_deref(), Some("notes.txt"));
            assert_eq!(ttl, Some(60));
            assert_eq!(max_views, Some(3));
        }
        _ => panic!("expected new command"),
    }
}

#[test]
fn server_flag_falls_back_to_env_var() {
    let _lock = env_lock().lock().expect("env lock");
    let mut env = ScopedEnv::clear(&["TBIN_SERVER"]);

    let cli = Cli::try_parse_from(["tbin", "health"]).expect("parse");
    assert_eq!(cli.server, None);

    env.set("TBIN_SERVER", "http://paste.internal:9000");
    let cli = Cli::try_parse_from(["tbin", "--json", "get", "abc"]).expect("parse");
    assert_eq!(cli.server.as_deref(), Some("http://paste.internal:9000"));
    assert!(cli.json);

    let cli = Cli::try_parse_from(["tbin", "--server", "http://other:1", "health"])
        .expect("parse");
    assert_eq!(cli.server.as_deref(), Some("http://other:1"));
}

#[test]
fn resolve_server_ignores_blank_overrides() {
    assert_eq!(resolve_server(None), DEFAULT_CLI_SERVER_URL);
    assert_eq!(resolve_server(Some("   ".to_string())), DEFAULT_CLI_SERVER_URL);
    assert_eq!(
        resolve_server(Some(" http://example.test ".to_string())),
        "http://example.test"
    );
    assert!(DEFAULT_CLI_SERVER_URL.ends_with(&DEFAULT_PORT.to_string()));
}

#[test]
fn normalize_server_rewrites_localhost_and_trailing_slash() {
    assert_eq!(
        normalize_server("http://localhost:38421/".to_string()),
        "http://127.0.0.1:38421"
    );
    assert_eq!(
        normalize_server("https://localhost/".to_string()),
        "https://localhost"
    );
    assert_eq!(normalize_server("not a url".to_string()), "not a url");
}

#[test]
fn api_url_appends_segments_to_base_path() {
    let url = api_url("http://127.0.0.1:38421", &["api", "pastes", "abc"]).expect("url");
    assert_eq!(url.as_str(), "http://127.0.0.1:38421/api/pastes/abc");

    let nested = api_url("https://example.test/bin/", &["healthz"]).expect("url");
    assert_eq!(nested.as_str(), "https://example.test/bin/healthz");

    let err = api_url("::nope", &["api"]).expect_err("invalid base");
    assert!(err.contains("Invalid server URL"));
}

#[test]
fn error_message_prefers_json_error_field() {
    let cases = [
        (
            reqwest::StatusCode::NOT_FOUND,
            r#"{"error":"Paste not found"}"#,
            "Paste not found",
        ),
        (
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"other":"x"}"#,
            r#"{"other":"x"}"#,
        ),
        (
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream down",
            "upstream down",
        ),
        (reqwest::StatusCode::SERVICE_UNAVAILABLE, "  ", "Service Unavailable"),
    ];

    for (status, body, expected) in cases {
        assert_eq!(error_message_for_response(status, body), expected);
    }
}

#[test]
fn create_request_omits_unset_limits() {
    let body = serde_json::to_value(create_request("hi\n".to_string(), None, Some(2)))
        .expect("serialize");
    assert_eq!(body, json!({ "content": "hi\n", "max_views": 2 }));
}

#[test]
fn output_formats_for_new_and_get() {
    let created = CreatePasteResponse {
        id: "abc".to_string(),
        url: "http://127.0.0.1:38421/p/abc".to_string(),
    };
    assert_eq!(
        format_new_output(&created, false).expect("text"),
        "Created: abc\nhttp://127.0.0.1:38421/p/abc"
    );
    let as_json: serde_json::Value =
        serde_json::from_str(&format_new_output(&created, true).expect("json")).expect("parse");
    assert_eq!(as_json["id"], "abc");

    let paste = PasteResponse {
        content: "hello\nworld".to_string(),
        remaining_views: Some(1),
        expires_at: None,
    };
    assert_eq!(format_get_output(&paste, false).expect("text"), "hello\nworld");
    let as_json: serde_json::Value =
        serde_json::from_str(&format_get_output(&paste, true).expect("json")).expect("parse");
    assert_eq!(as_json["remaining_views"], 1);
    assert!(as_json["expires_at"].is_null());
}

#[test]
fn health_status_reads_ok_flag() {
    assert_eq!(health_status(&json!({ "ok": true })), Some(true));
    assert_eq!(health_status(&json!({ "ok": false })), Some(false));
    assert_eq!(health_status(&json!({ "status": "up" })), None);
    assert_eq!(health_status(&serde_json::Value::Null), None);
}
