// src/services/publisher.rs

//! Status publishing.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials};
use crate::utils::http;
use crate::utils::oauth::{self, Nonce};

/// Provider error code for "Status is a duplicate."
pub const DUPLICATE_STATUS_CODE: i64 = 187;

/// What happened to a published status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The status was created
    Posted,
    /// The same text had already been posted
    Duplicate,
}

/// Destination for status messages.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Publish one status message.
    async fn publish(&self, status: &str) -> Result<PublishOutcome>;
}

/// Publisher backed by the provider's status update endpoint.
pub struct TwitterPublisher {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    code: i64,
}

impl TwitterPublisher {
    /// Create a publisher from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::create_publish_client(config)?,
            endpoint: config.api_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    fn form_body(status: &str) -> String {
        format!("status={}", oauth::encode(status))
    }
}

/// Whether an error response says the status was already posted.
pub fn is_duplicate(body: &str) -> bool {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| {
            parsed
                .errors
                .iter()
                .any(|e| e.code == DUPLICATE_STATUS_CODE)
        })
        .unwrap_or(false)
}

#[async_trait]
impl StatusPublisher for TwitterPublisher {
    async fn publish(&self, status: &str) -> Result<PublishOutcome> {
        let header = oauth::authorization_header(
            "POST",
            &self.endpoint,
            &[("status", status)],
            &self.credentials,
            &Nonce::generate(),
        )?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, header)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Self::form_body(status))
            .send()
            .await?;

        let code = response.status();
        if http::is_success(code) {
            return Ok(PublishOutcome::Posted);
        }

        let body = response.text().await?;
        if is_duplicate(&body) {
            log::warn!("Status already posted, skipping: {}", status);
            return Ok(PublishOutcome::Duplicate);
        }

        Err(AppError::Publish {
            status: code.as_u16(),
            body,
        })
    }
}

/// Publisher that only logs what it would post.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunPublisher;

#[async_trait]
impl StatusPublisher for DryRunPublisher {
    async fn publish(&self, status: &str) -> Result<PublishOutcome> {
        log::info!("[dry run] Would publish: {}", status);
        Ok(PublishOutcome::Posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: &str) -> Config {
        let mut config = Config::parse(
            "[Tracker]\nconsumer_key = \"ck\"\nconsumer_secret = \"cs\"\naccess_key = \"ak\"\naccess_secret = \"as\"",
        )
        .unwrap();
        config.api_url = api_url.to_string();
        config
    }

    #[test]
    fn test_is_duplicate() {
        assert!(is_duplicate(
            r#"{"errors":[{"code":187,"message":"Status is a duplicate."}]}"#
        ));
        assert!(!is_duplicate(
            r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#
        ));
        assert!(!is_duplicate("187"));
        assert!(!is_duplicate("<html>Service Unavailable</html>"));
    }

    #[test]
    fn test_form_body_is_percent_encoded() {
        assert_eq!(
            TwitterPublisher::form_body("a b+c \"d\""),
            "status=a%20b%2Bc%20%22d%22"
        );
    }

    #[tokio::test]
    async fn test_publish_posts_signed_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1.1/statuses/update.json"))
            .and(header_exists("authorization"))
            .and(body_string("status=hello%20world"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/1.1/statuses/update.json", server.uri());
        let publisher = TwitterPublisher::new(&config(&url)).unwrap();
        let outcome = publisher.publish("hello world").await.unwrap();
        assert_eq!(outcome, PublishOutcome::Posted);
    }

    #[tokio::test]
    async fn test_publish_absorbs_duplicate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string(
                r#"{"errors":[{"code":187,"message":"Status is a duplicate."}]}"#,
            ))
            .mount(&server)
            .await;

        let url = format!("{}/1.1/statuses/update.json", server.uri());
        let publisher = TwitterPublisher::new(&config(&url)).unwrap();
        let outcome = publisher.publish("hello again").await.unwrap();
        assert_eq!(outcome, PublishOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_publish_other_errors_are_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#,
            ))
            .mount(&server)
            .await;

        let url = format!("{}/1.1/statuses/update.json", server.uri());
        let publisher = TwitterPublisher::new(&config(&url)).unwrap();
        let err = publisher.publish("hello").await.unwrap_err();
        match err {
            AppError::Publish { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Could not authenticate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_dry_run_publisher() {
        assert_eq!(
            DryRunPublisher.publish("anything").await.unwrap(),
            PublishOutcome::Posted
        );
    }
}
