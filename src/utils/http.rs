// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Create the client used for status updates.
///
/// Shares the User-Agent of the tracker client; publishing keeps no request timeout.
pub fn create_publish_client(config: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}

/// Whether a status counts as success: its first two digits are `20`.
pub fn is_success(status: StatusCode) -> bool {
    status.as_u16() / 10 == 20
}

/// Fetch a page as text, failing on transport errors and non-success codes.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !is_success(status) {
        return Err(AppError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(is_success(StatusCode::OK));
        assert!(is_success(StatusCode::NO_CONTENT));
        assert!(!is_success(StatusCode::IM_USED));
        assert!(!is_success(StatusCode::MOVED_PERMANENTLY));
        assert!(!is_success(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_clients_send_configured_user_agent() {
        use wiremock::matchers::{header, method};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "devtracker-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(2)
            .mount(&server)
            .await;

        let mut config = Config::parse(
            "[Tracker]\nconsumer_key = ck\nconsumer_secret = cs\naccess_key = ak\naccess_secret = as",
        )
        .unwrap();
        config.user_agent = "devtracker-test/1.0".to_string();

        for client in [
            create_async_client(&config).unwrap(),
            create_publish_client(&config).unwrap(),
        ] {
            assert_eq!(fetch_text(&client, &server.uri()).await.unwrap(), "ok");
        }
    }
}
