//! Slack notification: Block Kit summary plus the drift records as a
//! threaded file attachment.
//!
//! Upload flow (external file upload API):
//! 1. `files.getUploadURLExternal` reserves an upload URL and file id
//! 2. the JSON attachment is posted to that URL
//! 3. `chat.postMessage` posts the summary and yields its `ts`
//! 4. `files.completeUploadExternal` shares the file in the message thread

#![allow(clippy::result_large_err)]

use crate::config::SlackConfig;
use crate::notify::Notifier;
use helminspect_core::errors::{ExError, ExErrorKind, Result};
use helminspect_core::{DriftReport, DriftSummary, RunIdentity};
use helminspect_core_types::Sensitive;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Public Slack Web API root
pub const SLACK_API_BASE: &str = "https://slack.com/api";

const ATTACHMENT_NAME: &str = "drift_report.json";
const ATTACHMENT_TITLE: &str = "Drift Report";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
struct SlackResponse {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
    upload_url: Option<String>,
    file_id: Option<String>,
    ts: Option<String>,
}

fn external_error(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op.to_string())
        .with_message(message)
}

/// Posts drift summaries to a Slack channel
pub struct SlackNotifier {
    channel: String,
    token: Sensitive<String>,
    api_base: String,
    client: Client,
}

impl SlackNotifier {
    /// # Errors
    ///
    /// Returns `ExErrorKind::ExternalService` if the HTTP client cannot be built.
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| external_error("slack_client", e.to_string()))?;
        Ok(Self {
            channel: config.channel,
            token: config.token,
            api_base: SLACK_API_BASE.to_string(),
            client,
        })
    }

    /// Point the notifier at another API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), method)
    }

    /// Send a Web API request and require `ok: true`
    fn call(&self, op: &str, request: RequestBuilder) -> Result<SlackResponse> {
        let response = request
            .bearer_auth(self.token.expose())
            .send()
            .map_err(|e| external_error(op, e.to_string()))?;
        let status = response.status();
        let body: SlackResponse = response.json().unwrap_or_default();
        if !status.is_success() || !body.ok {
            let reason = body.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(external_error(op, format!("HTTP {status}: {reason}")));
        }
        Ok(body)
    }

    fn reserve_upload(&self, length: usize) -> Result<(String, String)> {
        let op = "slack_get_upload_url";
        let length = length.to_string();
        let request = self
            .client
            .post(self.endpoint("files.getUploadURLExternal"))
            .form(&[("filename", ATTACHMENT_NAME), ("length", length.as_str())]);
        let body = self.call(op, request)?;
        match (body.upload_url, body.file_id) {
            (Some(url), Some(id)) => Ok((url, id)),
            _ => Err(external_error(op, "response lacks upload_url or file_id")),
        }
    }

    fn upload(&self, upload_url: &str, content: String) -> Result<()> {
        let response = self
            .client
            .post(upload_url)
            .bearer_auth(self.token.expose())
            .query(&[("filename", ATTACHMENT_NAME)])
            .body(content)
            .send()
            .map_err(|e| external_error("slack_upload_file", e.to_string()))?;
        if !response.status().is_success() {
            return Err(external_error(
                "slack_upload_file",
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(())
    }

    fn post_message(&self, blocks: &Value) -> Result<String> {
        let op = "slack_post_message";
        let request = self
            .client
            .post(self.endpoint("chat.postMessage"))
            .json(&json!({"channel": self.channel, "blocks": blocks}));
        self.call(op, request)?
            .ts
            .ok_or_else(|| external_error(op, "response lacks ts"))
    }

    fn complete_upload(&self, file_id: &str, thread_ts: &str) -> Result<()> {
        let request = self
            .client
            .post(self.endpoint("files.completeUploadExternal"))
            .json(&json!({
                "files": [{"id": file_id, "title": ATTACHMENT_TITLE}],
                "channel_id": self.channel,
                "thread_ts": thread_ts,
            }));
        self.call("slack_complete_upload", request).map(|_| ())
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, identity: &RunIdentity, report: &DriftReport) -> Result<()> {
        let content = attachment_content(report)?;
        let (upload_url, file_id) = self.reserve_upload(content.len())?;
        self.upload(&upload_url, content)?;
        let ts = self.post_message(&build_message(identity, &report.drift_summary))?;
        self.complete_upload(&file_id, &ts)?;
        tracing::info!(channel = %self.channel, "✨ Slack notification sent successfully.");
        Ok(())
    }
}

/// Block Kit blocks for the run summary
pub fn build_message(identity: &RunIdentity, summary: &DriftSummary) -> Value {
    let status = if summary.has_drift() {
        "*Drift Status:* Detected!"
    } else {
        "*Drift Status:* Clean"
    };
    let field = |text: String| json!({"type": "mrkdwn", "text": text});

    json!([
        {
            "type": "header",
            "text": {"type": "plain_text", "text": "🚨 Helm Drift Anomaly Report", "emoji": true}
        },
        {"type": "divider"},
        {
            "type": "section",
            "fields": [
                field(format!("*Release:* `{}`", identity.release)),
                field(format!("*Namespace:* `{}`", identity.namespace)),
                field(format!("*Cluster:* `{}`", identity.cluster)),
                field(status.to_string()),
            ]
        },
        {"type": "divider"},
        {
            "type": "section",
            "fields": [
                field(format!("*Total Drifts Detected:* {}", summary.total_drifts)),
                field(format!("*New Keys Detected:* {}", summary.new_keys)),
                field(format!("*Missing Keys Detected:* {}", summary.removed_keys)),
                field(format!("*Changed Keys Detected:* {}", summary.modified_keys)),
            ]
        },
        {"type": "divider"},
        {
            "type": "section",
            "text": {"type": "mrkdwn", "text": "Drift Report Attached Below!"}
        }
    ])
}

/// The attached file: the drift records as pretty JSON
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if the records cannot be encoded.
pub fn attachment_content(report: &DriftReport) -> Result<String> {
    serde_json::to_string_pretty(&report.drift_reports).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("slack_attachment")
            .with_message(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use helminspect_core::model::{Path, ResourceKind};
    use helminspect_core::{DriftRecord, DriftType};

    fn identity() -> RunIdentity {
        RunIdentity::new("web", "prod", "kind-dev")
    }

    #[test]
    fn test_clean_message() {
        let blocks = build_message(&identity(), &DriftSummary::default());
        assert_eq!(blocks[0]["text"]["text"], json!("🚨 Helm Drift Anomaly Report"));
        assert_eq!(blocks[2]["fields"][0]["text"], json!("*Release:* `web`"));
        assert_eq!(blocks[2]["fields"][3]["text"], json!("*Drift Status:* Clean"));
        assert_eq!(blocks[4]["fields"][0]["text"], json!("*Total Drifts Detected:* 0"));
    }

    #[test]
    fn test_drift_message_counts() {
        let summary = DriftSummary {
            total_drifts: 4,
            new_keys: 1,
            removed_keys: 2,
            modified_keys: 1,
        };
        let blocks = build_message(&identity(), &summary);
        assert_eq!(blocks[2]["fields"][3]["text"], json!("*Drift Status:* Detected!"));
        assert_eq!(blocks[4]["fields"][2]["text"], json!("*Missing Keys Detected:* 2"));
    }

    #[test]
    fn test_attachment_holds_only_records() {
        let mut report = DriftReport::new();
        report.push_record(DriftRecord {
            kind: ResourceKind::ConfigMap,
            name: "settings".to_string(),
            drift_type: DriftType::KeyRemoved,
            path: Path::parse("a"),
            old_value: Some(json!("1")),
            new_value: None,
        });
        let parsed: Value = serde_json::from_str(&attachment_content(&report).unwrap()).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(1));
        assert_eq!(parsed[0]["drift_type"], json!("key_removed"));
    }

    #[test]
    fn test_endpoint_joins_base() {
        let notifier = SlackNotifier::new(SlackConfig {
            channel: "#drift".to_string(),
            token: Sensitive::new("xoxb-test".to_string()),
        })
        .unwrap()
        .with_api_base("http://127.0.0.1:9/api/");
        assert_eq!(
            notifier.endpoint("chat.postMessage"),
            "http://127.0.0.1:9/api/chat.postMessage"
        );
    }

    #[test]
    fn test_unreachable_api_is_external_service_error() {
        let notifier = SlackNotifier::new(SlackConfig {
            channel: "#drift".to_string(),
            token: Sensitive::new("xoxb-test".to_string()),
        })
        .unwrap()
        .with_api_base("http://127.0.0.1:9/api");
        let err = notifier
            .notify(&identity(), &DriftReport::new())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
    }
}
