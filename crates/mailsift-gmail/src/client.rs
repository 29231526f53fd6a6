//! HTTP client for the Gmail REST API.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::MailApi;
use crate::error::{Error, Result};
use crate::types::{ErrorEnvelope, Label, LabelList, ListQuery, Message, MessageList};

/// Production API root.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// The authenticated user, as the API spells it.
pub const ME: &str = "me";

/// Gmail API client bound to one access token.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    /// Creates a client for the production endpoint.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GMAIL_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Points the client at another API root (no trailing slash needed).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the API root in use.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| Error::Unauthorized(format!("invalid access token: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn url(&self, user_id: &str, path: &str) -> String {
        format!("{}/users/{user_id}/{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        debug!(url, ?params, "GET");
        let response = self
            .http
            .get(url)
            .headers(self.headers()?)
            .query(params)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn handle_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        if status == 401 {
            Error::Unauthorized(message)
        } else {
            Error::Api { status, message }
        }
    }

    /// Lists every label in the mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_labels(&self, user_id: &str) -> Result<Vec<Label>> {
        let list: LabelList = self.get(&self.url(user_id, "labels"), &[]).await?;
        Ok(list.labels)
    }

    /// Fetches one page of message IDs matching a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn list_messages(&self, user_id: &str, query: &ListQuery) -> Result<MessageList> {
        self.get(&self.url(user_id, "messages"), &query.to_params())
            .await
    }

    /// Fetches a message in the default format (labels, headers, structure).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get_message(&self, user_id: &str, id: &str) -> Result<Message> {
        self.get(&self.url(user_id, &format!("messages/{id}")), &[])
            .await
    }

    /// Fetches the full RFC 2822 bytes of a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response has no `raw`
    /// field, or the field is not valid base64url.
    pub async fn get_raw_message(&self, user_id: &str, id: &str) -> Result<Vec<u8>> {
        let message: Message = self
            .get(
                &self.url(user_id, &format!("messages/{id}")),
                &[("format", "raw".to_string())],
            )
            .await?;
        let raw = message.raw.ok_or_else(|| Error::MissingRaw(id.to_string()))?;
        Ok(mailsift_mime::encoding::decode_base64_url(&raw)?)
    }
}

impl MailApi for GmailClient {
    async fn list_labels(&self, user_id: &str) -> Result<Vec<Label>> {
        Self::list_labels(self, user_id).await
    }

    async fn list_messages(&self, user_id: &str, query: &ListQuery) -> Result<MessageList> {
        Self::list_messages(self, user_id, query).await
    }

    async fn get_message(&self, user_id: &str, id: &str) -> Result<Message> {
        Self::get_message(self, user_id, id).await
    }

    async fn get_raw_message(&self, user_id: &str, id: &str) -> Result<Vec<u8>> {
        Self::get_raw_message(self, user_id, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned HTTP response and reports the request head.
    async fn serve_once(status: &'static str, body: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (format!("http://{addr}"), rx)
    }

    #[tokio::test]
    async fn test_list_labels_sends_bearer_token() {
        let body = r#"{"labels":[{"id":"INBOX","name":"INBOX","type":"system"},{"id":"Label_1","name":"JOB/Applied"}]}"#;
        let (base, request) = serve_once("200 OK", body.to_string()).await;

        let client = GmailClient::new("ya29.token").with_base_url(base);
        let labels = client.list_labels(ME).await.unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].name, "JOB/Applied");

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /users/me/labels "));
        assert!(request.to_lowercase().contains("authorization: bearer ya29.token"));
    }

    #[tokio::test]
    async fn test_list_messages_query_params() {
        let body = r#"{"messages":[{"id":"a","threadId":"t"}],"nextPageToken":"p2","resultSizeEstimate":42}"#;
        let (base, request) = serve_once("200 OK", body.to_string()).await;

        let client = GmailClient::new("t").with_base_url(format!("{base}/"));
        let query = ListQuery::new("after:2025/03/01").with_max_results(1);
        let page = client.list_messages(ME, &query).await.unwrap();

        assert_eq!(page.messages[0].id, "a");
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));
        assert_eq!(page.result_size_estimate, 42);

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /users/me/messages?q=after%3A2025%2F03%2F01&maxResults=1 "));
    }

    #[tokio::test]
    async fn test_get_raw_message_decodes_base64url() {
        // "Subject: ok\r\n\r\n??>" in base64url.
        let body = r#"{"id":"m1","raw":"U3ViamVjdDogb2sNCg0KPz8-"}"#;
        let (base, request) = serve_once("200 OK", body.to_string()).await;

        let client = GmailClient::new("t").with_base_url(base);
        let raw = client.get_raw_message(ME, "m1").await.unwrap();
        assert_eq!(raw, b"Subject: ok\r\n\r\n??>");

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /users/me/messages/m1?format=raw "));
    }

    #[tokio::test]
    async fn test_missing_raw_field() {
        let (base, _request) = serve_once("200 OK", r#"{"id":"m1"}"#.to_string()).await;
        let client = GmailClient::new("t").with_base_url(base);
        let err = client.get_raw_message(ME, "m1").await.unwrap_err();
        assert!(matches!(err, Error::MissingRaw(id) if id == "m1"));
    }

    #[tokio::test]
    async fn test_error_envelope_is_unwrapped() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
        let (base, _request) = serve_once("404 Not Found", body.to_string()).await;

        let client = GmailClient::new("t").with_base_url(base);
        let err = client.get_message(ME, "missing").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Requested entity was not found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let (base, _request) = serve_once("401 Unauthorized", "expired".to_string()).await;
        let client = GmailClient::new("t").with_base_url(base);
        let err = client.list_labels(ME).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(msg) if msg == "expired"));
    }
}
