//! Form submission and response classification.
//!
//! Admin pages post urlencoded forms to fixed endpoints and decide what to
//! show from the response body. The modern contract is a structured status
//! envelope (`{"status": "ok" | "error", "message": …}`); the legacy contract
//! embeds `window._errorMsg = "…"` / `window._successMsg = "…"` sentinel
//! markers in an HTML body. Both are handled, envelope first. A body with
//! neither is treated as implicit success and the page reloads with the
//! success message carried in a `?success=` query parameter.
//!
//! The sentinel scan is a best-effort string match: a body that happens to
//! contain the marker text inside unrelated content will be misclassified.
//! Known fragility, kept for compatibility.

use reqwest::Url;
use serde::Deserialize;

use crate::error::BridgeError;

pub const SENTINEL_ERROR: &str = "window._errorMsg";
pub const SENTINEL_SUCCESS: &str = "window._successMsg";

/// Message used when a response carries no message of its own.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Action completed successfully!";

/// Fixed form endpoints served by the admin API.
pub mod endpoints {
    pub const INGREDIENTS_ADD: &str = "/ingredients/add";
    pub const INGREDIENTS_RESTOCK: &str = "/ingredients/restock";
    pub const PURCHASE: &str = "/purchase";
    pub const TOAST_ROUND: &str = "/toast_round";
    pub const USERS_ADD: &str = "/users/add";
    pub const USERS_TRANSACTIONS: &str = "/users/transactions";
}

/// What the page should do with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Show an error popup. Never mutates the URL.
    ShowError(String),
    /// Show a success popup. Never mutates the URL.
    ShowSuccess(String),
    /// Reload the current page with `?success=<message>` appended.
    ReloadWithSuccess(String),
}

/// Structured status envelope (the primary contract).
#[derive(Deserialize)]
struct StatusEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Serialize form fields as an `application/x-www-form-urlencoded` body.
pub fn serialize_form(fields: &[(String, String)]) -> String {
    let mut body = String::new();
    for (key, value) in fields {
        if !body.is_empty() {
            body.push('&');
        }
        body.push_str(&form_urlencode(key));
        body.push('=');
        body.push_str(&form_urlencode(value));
    }
    body
}

fn form_urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

/// Extract the quoted message following a sentinel marker, tolerating
/// whitespace around the `=` (mirrors the `\s*=\s*"([^"]*)"` page scan).
pub fn scan_marker(body: &str, marker: &str) -> Option<String> {
    let mut search = body;
    while let Some(pos) = search.find(marker) {
        let after = search.get(pos + marker.len()..)?;
        if let Some(message) = quoted_value(after) {
            return Some(message);
        }
        search = after;
    }
    None
}

fn quoted_value(after_marker: &str) -> Option<String> {
    let rest = after_marker.trim_start();
    let rest = rest.strip_prefix('=')?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    rest.get(..end).map(ToString::to_string)
}

/// Classify a 2xx response body.
pub fn classify_response(body: &str) -> SubmitOutcome {
    if let Ok(envelope) = serde_json::from_str::<StatusEnvelope>(body.trim()) {
        let message = envelope.message.unwrap_or_default();
        return match envelope.status.as_str() {
            "ok" => {
                if message.is_empty() {
                    SubmitOutcome::ShowSuccess(DEFAULT_SUCCESS_MESSAGE.to_string())
                } else {
                    SubmitOutcome::ShowSuccess(message)
                }
            }
            _ => SubmitOutcome::ShowError(message),
        };
    }

    // Legacy sentinel scan. Error wins over success, matching the page logic.
    if let Some(message) = scan_marker(body, SENTINEL_ERROR) {
        if !message.is_empty() {
            return SubmitOutcome::ShowError(message);
        }
    }
    if let Some(message) = scan_marker(body, SENTINEL_SUCCESS) {
        if !message.is_empty() {
            return SubmitOutcome::ShowSuccess(message);
        }
    }

    SubmitOutcome::ReloadWithSuccess(DEFAULT_SUCCESS_MESSAGE.to_string())
}

/// POST a form to `base_url` + `path` and classify the result.
///
/// Transport failures (connection error or non-2xx status) become a
/// `NetworkError` whose popup text carries the per-endpoint generic message;
/// the transport-level cause is logged, never shown. No retries.
pub fn submit_form(
    client: &reqwest::blocking::Client,
    base_url: &str,
    path: &str,
    fields: &[(String, String)],
    failure_message: &str,
) -> SubmitOutcome {
    let url = format!("{}{path}", base_url.trim_end_matches('/'));
    match fetch_body(client, &url, fields) {
        Ok(body) => classify_response(&body),
        Err(cause) => {
            eprintln!("[Chame] {path}: {cause}");
            let error = BridgeError::NetworkError {
                message: failure_message.to_string(),
            };
            SubmitOutcome::ShowError(error.to_string())
        }
    }
}

fn fetch_body(
    client: &reqwest::blocking::Client,
    url: &str,
    fields: &[(String, String)],
) -> Result<String, BridgeError> {
    let response = client.post(url).form(fields).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(BridgeError::NetworkError {
            message: format!("HTTP {status}"),
        });
    }
    Ok(response.text()?)
}

// ── Success-via-query-parameter convention ──────────────────────

/// Append `?success=<message>` for the post-reload banner.
pub fn append_success(url: &Url, message: &str) -> Url {
    let mut with_success = url.clone();
    with_success
        .query_pairs_mut()
        .append_pair("success", message);
    with_success
}

/// Remove the `success` parameter, returning its value. The stripped URL is
/// what the page re-writes into history after showing the banner.
pub fn take_success(url: &mut Url) -> Option<String> {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut message = None;
    let rest: Vec<(String, String)> = pairs
        .into_iter()
        .filter_map(|(k, v)| {
            if k == "success" && message.is_none() {
                message = Some(v);
                None
            } else {
                Some((k, v))
            }
        })
        .collect();

    if message.is_some() {
        if rest.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(rest.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_success_is_shown_without_url_mutation() {
        let body = r#"<html><script>window._successMsg = "OK";</script></html>"#;
        assert_eq!(
            classify_response(body),
            SubmitOutcome::ShowSuccess("OK".to_string())
        );
        // Only ReloadWithSuccess implies a URL change; Show* never does.
    }

    #[test]
    fn sentinel_error_wins_over_success() {
        let body = concat!(
            r#"window._successMsg = "looks fine";"#,
            r#"window._errorMsg = "but it was not";"#
        );
        assert_eq!(
            classify_response(body),
            SubmitOutcome::ShowError("but it was not".to_string())
        );
    }

    #[test]
    fn scan_tolerates_whitespace_and_skips_bare_mentions() {
        assert_eq!(
            scan_marker("window._errorMsg   =   \"spaced\"", SENTINEL_ERROR),
            Some("spaced".to_string())
        );
        // A mention without `= "…"` is not a match, but a later real
        // assignment still is.
        let body = r#"check window._errorMsg in devtools; window._errorMsg = "real""#;
        assert_eq!(scan_marker(body, SENTINEL_ERROR), Some("real".to_string()));
        assert_eq!(scan_marker("no markers here", SENTINEL_ERROR), None);
    }

    #[test]
    fn body_without_markers_reloads_with_default_success() {
        assert_eq!(
            classify_response("<html>fresh page</html>"),
            SubmitOutcome::ReloadWithSuccess(DEFAULT_SUCCESS_MESSAGE.to_string())
        );
    }

    #[test]
    fn envelope_takes_priority_over_sentinels() {
        let body = r#"{"status": "error", "message": "Not enough balance"}"#;
        assert_eq!(
            classify_response(body),
            SubmitOutcome::ShowError("Not enough balance".to_string())
        );
        let body = r#"{"status": "ok", "message": "Ingredient restocked successfully!"}"#;
        assert_eq!(
            classify_response(body),
            SubmitOutcome::ShowSuccess("Ingredient restocked successfully!".to_string())
        );
    }

    #[test]
    fn form_serialization_escapes_reserved_characters() {
        let fields = vec![
            ("name".to_string(), "Käse & Brot".to_string()),
            ("quantities[]".to_string(), "2".to_string()),
        ];
        let body = serialize_form(&fields);
        assert_eq!(body, "name=K%C3%A4se+%26+Brot&quantities%5B%5D=2");
    }

    #[test]
    fn success_param_round_trip() {
        let url = Url::parse("http://127.0.0.1:8000/ingredients?config=week").unwrap();
        let mut with_success = append_success(&url, "Ingredient added!");
        assert!(with_success.as_str().contains("success=Ingredient"));

        let message = take_success(&mut with_success);
        assert_eq!(message.as_deref(), Some("Ingredient added!"));
        // Other query parameters survive the strip.
        assert!(with_success.as_str().contains("config=week"));
        assert!(!with_success.as_str().contains("success="));
    }

    #[test]
    fn connection_failure_surfaces_a_network_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let outcome = submit_form(
            &client,
            &format!("http://127.0.0.1:{port}"),
            endpoints::INGREDIENTS_ADD,
            &[("name".to_string(), "Toast".to_string())],
            "Failed to add ingredient.",
        );
        assert_eq!(
            outcome,
            SubmitOutcome::ShowError("Network error: Failed to add ingredient.".to_string())
        );
    }

    #[test]
    fn non_success_status_surfaces_a_network_error() {
        use std::io::{Read as _, Write as _};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let outcome = submit_form(
            &client,
            &format!("http://127.0.0.1:{port}"),
            endpoints::USERS_ADD,
            &[("name".to_string(), "Ann".to_string())],
            "Failed to add user.",
        );
        server.join().unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::ShowError("Network error: Failed to add user.".to_string())
        );
    }

    #[test]
    fn take_success_on_clean_url_is_noop() {
        let mut url = Url::parse("http://127.0.0.1:8000/users").unwrap();
        assert!(take_success(&mut url).is_none());
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/users");
    }
}
