//! Gmail API v1 resource types.

use serde::{Deserialize, Serialize};

/// A mailbox label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Label ID (e.g. `INBOX`, `Label_12`).
    pub id: String,
    /// Display name (e.g. `JOB/Rejected`).
    pub name: String,
    /// `system` or `user`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
}

/// `labels.list` response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LabelList {
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Reference to a message returned by `messages.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Message ID.
    pub id: String,
    /// Thread ID.
    #[serde(default)]
    pub thread_id: String,
}

/// One page of `messages.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    /// Messages on this page (absent in the API response when none match).
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    /// Token for the next page; `None` on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Server-side estimate of the total number of matches.
    #[serde(default)]
    pub result_size_estimate: u64,
}

/// Parameters for `messages.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Gmail search query (`q`).
    pub q: Option<String>,
    /// Page token from a previous response.
    pub page_token: Option<String>,
    /// Page size (`maxResults`).
    pub max_results: Option<u32>,
}

impl ListQuery {
    /// Creates a query for the given search string.
    #[must_use]
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    /// Sets the page token.
    #[must_use]
    pub fn with_page_token(mut self, token: Option<String>) -> Self {
        self.page_token = token;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(token) = &self.page_token {
            params.push(("pageToken", token.clone()));
        }
        if let Some(max) = self.max_results {
            params.push(("maxResults", max.to_string()));
        }
        params
    }
}

/// A message header as returned in `payload.headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as sent.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Top-level message payload (only the parts this client reads).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Headers in the order the message carries them.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// MIME type of the top-level entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A message from `messages.get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Thread ID.
    #[serde(default)]
    pub thread_id: String,
    /// Label IDs applied to the message.
    #[serde(default)]
    pub label_ids: Vec<String>,
    /// Short preview text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Parsed payload (default format).
    #[serde(default)]
    pub payload: Payload,
    /// Base64url RFC 2822 message (`format=raw` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Message {
    /// Returns the first header with exactly this name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

/// Google API error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_list_missing_messages() {
        let list: MessageList = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(list.messages.is_empty());
        assert_eq!(list.next_page_token, None);
    }

    #[test]
    fn test_message_deserialize_and_header_lookup() {
        let json = r#"{
            "id": "18c1",
            "threadId": "18c0",
            "labelIds": ["INBOX", "Label_7"],
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "From", "value": "Jane <jane@corp.example>"},
                    {"name": "Subject", "value": "Application received"}
                ]
            }
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.label_ids, vec!["INBOX", "Label_7"]);
        assert_eq!(message.header("Subject"), Some("Application received"));
        assert_eq!(message.header("subject"), None);
        assert_eq!(message.raw, None);
    }

    #[test]
    fn test_list_query_params() {
        let query = ListQuery::new("after:2025/03/01")
            .with_page_token(Some("tok".to_string()))
            .with_max_results(1);
        assert_eq!(
            query.to_params(),
            vec![
                ("q", "after:2025/03/01".to_string()),
                ("pageToken", "tok".to_string()),
                ("maxResults", "1".to_string()),
            ]
        );
        assert!(ListQuery::default().to_params().is_empty());
    }
}
