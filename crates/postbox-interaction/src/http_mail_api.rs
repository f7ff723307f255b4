//! HttpMailApi - REST client for the mail backend.
//!
//! Speaks the backend's JSON contract over HTTP. The base URL comes from
//! `config.toml` (or `POSTBOX_API_URL`); every route lives under `/api`.

use async_trait::async_trait;
use postbox_core::config::ClientConfig;
use postbox_core::mail::{
    Acknowledgement, EmailMessage, EmailQuery, FolderInfo, LoginRequest, LoginResponse, MailApi,
    SendEmailRequest, SyncRequest, SyncResponse,
};
use postbox_core::{PostboxError, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// [`MailApi`] implementation that talks to the backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMailApi {
    client: Client,
    base_url: Url,
}

impl HttpMailApi {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PostboxError::config(format!("Failed to build HTTP client: {err}")))?;
        Self::with_client(client, base_url)
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.api_base(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Uses a preconfigured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| {
            PostboxError::config(format!("Invalid backend URL '{base_url}': {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PostboxError::config(format!(
                "Backend URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, op: &str) -> Result<T> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(op, error = %err, "backend request failed");
            PostboxError::Network(format!("{op} request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::debug!(op, status = status.as_u16(), "backend returned an error");
            return Err(map_http_error(status, &body_text));
        }

        response.json::<T>().await.map_err(|err| PostboxError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to parse {op} response: {err}"),
        })
    }
}

#[derive(Serialize)]
struct UserQuery<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct ListQuery<'a> {
    user_id: &'a str,
    folder: &'a str,
    limit: u32,
    skip: u32,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    user_id: &'a str,
    query: &'a str,
    limit: u32,
}

#[derive(Serialize)]
struct ReadFlag {
    is_read: bool,
}

#[async_trait]
impl MailApi for HttpMailApi {
    async fn health(&self) -> Result<String> {
        let request = self.client.get(self.endpoint(&[""]));
        let ack: Acknowledgement = self.send_json(request, "health").await?;
        Ok(ack.message)
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        tracing::debug!(email = %request.email, host = %request.imap_config.host, "logging in");
        let http = self
            .client
            .post(self.endpoint(&["auth", "login"]))
            .json(request);
        self.send_json(http, "login").await
    }

    async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse> {
        let http = self
            .client
            .post(self.endpoint(&["emails", "sync"]))
            .json(request);
        self.send_json(http, "sync").await
    }

    async fn list_emails(&self, user_id: &str, query: &EmailQuery) -> Result<Vec<EmailMessage>> {
        let http = self.client.get(self.endpoint(&["emails"])).query(&ListQuery {
            user_id,
            folder: &query.folder,
            limit: query.limit,
            skip: query.skip,
        });
        self.send_json(http, "list emails").await
    }

    async fn search_emails(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<EmailMessage>> {
        let http = self
            .client
            .get(self.endpoint(&["emails", "search"]))
            .query(&SearchQuery {
                user_id,
                query,
                limit,
            });
        self.send_json(http, "search emails").await
    }

    async fn get_email(&self, user_id: &str, email_id: &str) -> Result<EmailMessage> {
        let http = self
            .client
            .get(self.endpoint(&["emails", email_id]))
            .query(&UserQuery { user_id });
        self.send_json(http, "get email")
            .await
            .map_err(|err| email_not_found(err, email_id))
    }

    async fn set_read(&self, user_id: &str, email_id: &str, is_read: bool) -> Result<()> {
        let http = self
            .client
            .put(self.endpoint(&["emails", email_id, "read"]))
            .query(&UserQuery { user_id })
            .json(&ReadFlag { is_read });
        let _: Acknowledgement = self
            .send_json(http, "update read status")
            .await
            .map_err(|err| email_not_found(err, email_id))?;
        Ok(())
    }

    async fn delete_email(&self, user_id: &str, email_id: &str) -> Result<()> {
        let http = self
            .client
            .delete(self.endpoint(&["emails", email_id]))
            .query(&UserQuery { user_id });
        let _: Acknowledgement = self
            .send_json(http, "delete email")
            .await
            .map_err(|err| email_not_found(err, email_id))?;
        Ok(())
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<()> {
        let http = self
            .client
            .post(self.endpoint(&["emails", "send"]))
            .json(request);
        let _: Acknowledgement = self.send_json(http, "send email").await?;
        Ok(())
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<FolderInfo>> {
        let http = self
            .client
            .get(self.endpoint(&["folders"]))
            .query(&UserQuery { user_id });
        self.send_json(http, "list folders").await
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

fn map_http_error(status: StatusCode, body: &str) -> PostboxError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| match wrapper.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => PostboxError::Unauthorized(message),
        StatusCode::NOT_FOUND => PostboxError::not_found("resource", message),
        _ => PostboxError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn email_not_found(err: PostboxError, email_id: &str) -> PostboxError {
    match err {
        PostboxError::NotFound { .. } => PostboxError::not_found("email", email_id),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpMailApi {
        HttpMailApi::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let api = api("http://localhost:8001");
        assert_eq!(api.endpoint(&[""]).as_str(), "http://localhost:8001/api/");
        assert_eq!(
            api.endpoint(&["emails", "e 1", "read"]).as_str(),
            "http://localhost:8001/api/emails/e%201/read"
        );

        let prefixed = self::api("https://mail.example.com/backend/");
        assert_eq!(
            prefixed.endpoint(&["folders"]).as_str(),
            "https://mail.example.com/backend/api/folders"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(HttpMailApi::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpMailApi::new("mailto:a@b.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_map_http_error() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"IMAP connection failed: bad password"}"#,
        );
        assert!(matches!(err, PostboxError::Unauthorized(ref m) if m.contains("bad password")));

        let err = map_http_error(StatusCode::NOT_FOUND, r#"{"detail":"User not found"}"#);
        assert!(err.is_not_found());

        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
        assert!(matches!(
            err,
            PostboxError::Api { status: 500, ref message } if message == "upstream exploded"
        ));

        // Validation errors carry structured detail
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"}]}"#,
        );
        assert!(matches!(err, PostboxError::Api { status: 422, ref message } if message.contains("valid email")));
    }

    #[test]
    fn test_email_not_found_mapping() {
        let err = email_not_found(
            map_http_error(StatusCode::NOT_FOUND, r#"{"detail":"Email not found"}"#),
            "e-9",
        );
        assert!(matches!(err, PostboxError::NotFound { entity_type: "email", ref id } if id == "e-9"));

        let err = email_not_found(PostboxError::Network("down".into()), "e-9");
        assert!(err.is_network());
    }
}
