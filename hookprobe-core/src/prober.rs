//! Single-shot webhook delivery.
//!
//! A probe is one blocking POST of a [`CallTranscriptEvent`] followed by a
//! plain-text report:
//! - `Status Code: <int>` and `Response: <text>` when the endpoint answered
//! - `Error: <description>` when the request never completed
//!
//! Any HTTP status counts as an answer. Transport failures are reported, not
//! propagated, and are never retried.

use std::io::{self, Write};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, TargetConfig};
use crate::error::ProbeError;
use crate::models::CallTranscriptEvent;

/// Header Rounded uses to carry its payload signature.
pub const SIGNATURE_HEADER: &str = "x-rounded-signature";

/// What the endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Delivered(ProbeResponse),
    /// Description of the transport failure.
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeOutcome::Failed(_))
    }

    /// Writes the report lines.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            ProbeOutcome::Delivered(resp) => {
                writeln!(out, "Status Code: {}", resp.status)?;
                writeln!(out, "Response: {}", resp.body)
            }
            ProbeOutcome::Failed(description) => writeln!(out, "Error: {}", description),
        }
    }
}

impl From<Result<ProbeResponse, ProbeError>> for ProbeOutcome {
    fn from(result: Result<ProbeResponse, ProbeError>) -> Self {
        match result {
            Ok(resp) => ProbeOutcome::Delivered(resp),
            Err(e) => ProbeOutcome::Failed(describe(&e)),
        }
    }
}

/// Joins an error with its `source()` chain, skipping causes whose text is
/// already part of the message.
fn describe(err: &dyn std::error::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}

/// Blocking client bound to one target URL and signature.
#[derive(Debug, Clone)]
pub struct WebhookProber {
    client: Client,
    url: String,
    headers: HeaderMap,
}

impl WebhookProber {
    pub fn new(target: &TargetConfig, http: &HttpConfig) -> Result<Self, ProbeError> {
        let signature = HeaderValue::from_str(&target.signature).map_err(|e| {
            ProbeError::InvalidHeader {
                name: SIGNATURE_HEADER,
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(SIGNATURE_HEADER, signature);

        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            url: target.url.clone(),
            headers,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs `event` once and returns whatever the endpoint answered.
    pub fn send(&self, event: &CallTranscriptEvent) -> Result<ProbeResponse, ProbeError> {
        let body = serde_json::to_vec(event)?;

        info!(url = %self.url, event = %event.event_type, id = %event.id, "Sending webhook");
        debug!(payload = %String::from_utf8_lossy(&body), "Webhook payload");

        let resp = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .body(body)
            .send()?;

        let status = resp.status();
        let body = resp.text()?;

        info!(status = status.as_u16(), "Webhook answered");
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            debug!(response = %json, "Response body is JSON");
        }

        Ok(ProbeResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Sends `event` and writes the report to `out`.
///
/// Only a failure to write the report is returned as an error.
pub fn run_probe<W: Write>(
    prober: &WebhookProber,
    event: &CallTranscriptEvent,
    out: &mut W,
) -> io::Result<ProbeOutcome> {
    let result = prober.send(event);
    if let Err(e) = &result {
        warn!(url = %prober.url(), error = %e, "Webhook delivery failed");
    }

    let outcome = ProbeOutcome::from(result);
    outcome.render(out)?;
    Ok(outcome)
}
