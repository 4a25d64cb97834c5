//! Server-rendered HTML: home form, paste page and error pages.

use crate::handlers::request_now;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const BASE_STYLE: &str = r#"
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
  background-color: #f5f5f5;
  margin: 0;
  padding: 40px 20px;
}
.card {
  background: white;
  border-radius: 8px;
  padding: 32px;
  max-width: 800px;
  margin: 0 auto;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
}
.error-card { max-width: 600px; margin-top: 60px; text-align: center; }
.error-card h1 { color: #d32f2f; margin-bottom: 16px; }
.error-card p { color: #666; margin-bottom: 24px; }
a { color: #1976d2; text-decoration: none; }
a:hover { text-decoration: underline; }
"#;

const HOME_BODY: &str = r#"<div class="card">
  <h1>Pastebin</h1>
  <p class="subtitle">Create and share text snippets</p>
  <form id="paste-form">
    <label for="content">Content <span class="required">*</span></label>
    <textarea id="content" rows="12" placeholder="Enter your text here..." required></textarea>
    <div class="options">
      <div>
        <label for="ttl">TTL (seconds)</label>
        <input type="number" id="ttl" min="1" placeholder="Optional">
        <small>Paste expires after this many seconds</small>
      </div>
      <div>
        <label for="views">Max Views</label>
        <input type="number" id="views" min="1" placeholder="Optional">
        <small>Paste becomes unavailable after this many views</small>
      </div>
    </div>
    <div id="error" class="error" hidden></div>
    <div id="success" class="success" hidden>
      <p>Paste created successfully!</p>
      <a id="paste-url" target="_blank" rel="noopener noreferrer"></a>
    </div>
    <button type="submit" id="submit">Create Paste</button>
  </form>
</div>
<script>
(function () {
  const form = document.getElementById("paste-form");
  const errorBox = document.getElementById("error");
  const success = document.getElementById("success");
  const link = document.getElementById("paste-url");
  const button = document.getElementById("submit");

  function showError(message) {
    errorBox.textContent = message;
    errorBox.hidden = false;
  }

  function readLimit(id, label) {
    const raw = document.getElementById(id).value.trim();
    if (!raw) return undefined;
    const value = Number(raw);
    if (!Number.isInteger(value) || value < 1) {
      throw new Error(label + " must be an integer >= 1");
    }
    return value;
  }

  form.addEventListener("submit", async function (event) {
    event.preventDefault();
    errorBox.hidden = true;
    success.hidden = true;

    const body = { content: document.getElementById("content").value };
    try {
      const ttl = readLimit("ttl", "TTL");
      const views = readLimit("views", "Max views");
      if (ttl !== undefined) body.ttl_seconds = ttl;
      if (views !== undefined) body.max_views = views;
    } catch (err) {
      showError(err.message);
      return;
    }

    button.disabled = true;
    button.textContent = "Creating...";
    try {
      const response = await fetch("/api/pastes", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(body),
      });
      const data = await response.json();
      if (!response.ok) {
        showError(data.error || "Failed to create paste");
        return;
      }
      link.href = data.url;
      link.textContent = data.url;
      success.hidden = false;
      form.reset();
    } catch (err) {
      showError("Network error. Please try again.");
    } finally {
      button.disabled = false;
      button.textContent = "Create Paste";
    }
  });
})();
</script>"#;

const HOME_STYLE: &str = r#"
h1 { margin: 0 0 8px 0; font-size: 32px; color: #333; }
.subtitle { margin: 0 0 24px 0; color: #666; }
form { display: flex; flex-direction: column; gap: 12px; }
label { font-weight: 600; color: #333; }
.required { color: #d32f2f; }
textarea, input { font: inherit; padding: 10px; border: 1px solid #ddd; border-radius: 4px; }
textarea { font-family: "Courier New", monospace; resize: vertical; }
.options { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
.options div { display: flex; flex-direction: column; gap: 8px; }
small { color: #888; }
.error { background: #ffebee; color: #c62828; padding: 12px; border-radius: 4px; }
.success { background: #e8f5e9; padding: 12px; border-radius: 4px; word-break: break-all; }
button { background: #1976d2; color: white; border: none; padding: 12px 24px; border-radius: 4px; font-size: 16px; cursor: pointer; }
button:disabled { background: #90caf9; cursor: not-allowed; }
"#;

const PASTE_STYLE: &str = r#"
.paste-header { margin-bottom: 16px; padding-bottom: 12px; border-bottom: 1px solid #e0e0e0; }
.paste-header h1 { margin: 0; font-size: 18px; color: #666; }
.paste-content {
  white-space: pre-wrap;
  word-wrap: break-word;
  font-family: "Courier New", monospace;
  font-size: 14px;
  line-height: 1.6;
  color: #333;
}
"#;

fn layout(title: &str, extra_style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        BASE_STYLE,
        extra_style,
        body
    )
}

fn error_page(title: &str, heading: &str, message: &str) -> String {
    layout(
        title,
        "",
        &format!(
            "<div class=\"card error-card\">\n<h1>{}</h1>\n<p>{}</p>\n<a href=\"/\">Create a new paste</a>\n</div>",
            escape_html(heading),
            escape_html(message)
        ),
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render paste content as inert HTML with line breaks preserved.
pub fn render_content(content: &str) -> String {
    escape_html(content).replace('\n', "<br />")
}

/// Full HTML document for a paste.
pub fn render_paste_page(id: &str, content: &str) -> String {
    layout(
        &format!("Paste #{}", id),
        PASTE_STYLE,
        &format!(
            "<div class=\"card\">\n<div class=\"paste-header\"><h1>Paste #{}</h1></div>\n\
             <div class=\"paste-content\">{}</div>\n</div>",
            escape_html(id),
            render_content(content)
        ),
    )
}

fn paste_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(error_page(
            "Paste Not Found",
            "404 - Paste Not Found",
            "The paste you're looking for doesn't exist, has expired, or has reached its view limit.",
        )),
    )
        .into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(error_page(
            "Something went wrong",
            "Something went wrong!",
            "An error occurred while processing your request.",
        )),
    )
        .into_response()
}

/// `GET /`: the submit form.
pub async fn home() -> Html<String> {
    Html(layout("Pastebin", HOME_STYLE, HOME_BODY))
}

/// `GET /p/:id`: read the paste (counting the view) and render it.
pub async fn view_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: axum::http::HeaderMap,
) -> Response {
    let now = request_now(&state, &headers);
    match state.service.consume(&id, now).await {
        Ok(Some(view)) => Html(render_paste_page(&id, &view.content)).into_response(),
        Ok(None) => paste_not_found(),
        Err(err) => {
            tracing::error!(%id, "Failed to render paste: {}", err);
            server_error()
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(error_page(
            "Page Not Found",
            "404 - Page Not Found",
            "The page you're looking for doesn't exist.",
        )),
    )
        .into_response()
}
