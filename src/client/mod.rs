//! HTTP client for the study tracker backend
//!
//! Thin wrapper over the three session endpoints. Requests carry
//! form-encoded bodies, responses come back as JSON. Failures are returned
//! to the caller; nothing here retries.

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use hyper::client::HttpConnector;
use hyper::{Body, Method, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Client for the study tracker's session endpoints
#[derive(Debug, Clone)]
pub struct StudyApi {
    base_url: String,
    client: hyper::Client<HttpConnector>,
}

/// Response of `GET /study/current`
///
/// Everything beyond `active` is optional: an idle backend answers with
/// the bare flag.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentSession {
    pub active: bool,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub elapsed_seconds: u64,
}

/// Response of `POST /study/start`
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    pub success: bool,
}

/// Response of `POST /study/stop`
#[derive(Debug, Clone, Deserialize)]
pub struct StopResponse {
    pub success: bool,
    /// Recorded session length in minutes, when the backend reports it
    #[serde(default)]
    pub duration: Option<u64>,
}

impl StudyApi {
    /// Create a client for the backend at `base_url` (no trailing slash)
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: hyper::Client::new(),
        }
    }

    /// Query the in-progress session, if any
    pub async fn current_session(&self) -> Result<CurrentSession> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("{}/study/current", self.base_url))
            .body(Body::empty())?;
        self.send(request).await
    }

    /// Start a session for `subject`, stamped with the client's clock
    pub async fn start_session(&self, subject: &str, start_time: DateTime<Utc>) -> Result<StartResponse> {
        let start = start_time.to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = form_encode(&[("subject", subject), ("start_time", &start)]);
        self.post_form("/study/start", body).await
    }

    /// Stop the in-progress session, stamped with the client's clock
    pub async fn stop_session(&self, end_time: DateTime<Utc>, notes: Option<&str>) -> Result<StopResponse> {
        let end = end_time.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut fields = vec![("end_time", end.as_str())];
        if let Some(notes) = notes {
            fields.push(("notes", notes));
        }
        let body = form_encode(&fields);
        self.post_form("/study/stop", body).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, body: String) -> Result<T> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}{}", self.base_url, path))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: Request<Body>) -> Result<T> {
        debug!("{} {}", request.method(), request.uri());

        let response = self.client.request(request).await?;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await?;

        if !status.is_success() {
            bail!("Backend returned {}", status);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Parse a backend-provided start timestamp
///
/// Sessions started from a browser carry an RFC 3339 offset; sessions the
/// backend stamped itself come back as naive ISO 8601 in UTC. Anything
/// unparseable yields `None` and the caller falls back to "now".
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Encode form fields as an `application/x-www-form-urlencoded` body
fn form_encode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencode(key), urlencode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
