/// Email client: the single point of entry for outbound contact mail.
///
/// No other module talks to the delivery provider directly; everything goes
/// through an `EmailTransport`. The production transport is `EmailJsClient`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod connectivity;

pub const EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Template parameters handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub company: String,
    pub to_email: String,
    pub reply_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the message (status {status}): {text}")]
    Status { status: u16, text: String },

    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// HTTP-style status of the failure, when the provider returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            TransportError::Other(_) => None,
        }
    }
}

/// Sends one templated message. Implementations may reject.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &EmailPayload,
    ) -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailPayload,
}

/// EmailJS REST transport. Requests are sent once; no retry and no request
/// timeout beyond the connect timeout.
#[derive(Clone)]
pub struct EmailJsClient {
    client: Client,
    public_key: String,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new(public_key: String) -> Result<Self, TransportError> {
        Self::with_endpoint(public_key, EMAILJS_API_URL.to_string())
    }

    pub fn with_endpoint(public_key: String, endpoint: String) -> Result<Self, TransportError> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            public_key,
            endpoint,
        })
    }
}

#[async_trait]
impl EmailTransport for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &EmailPayload,
    ) -> Result<TransportResponse, TransportError> {
        let body = EmailJsRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            template_params: payload,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read EmailJS response body (status {}): {}", status, e);
                String::new()
            }
        };

        if !status.is_success() {
            warn!("EmailJS returned {}: {}", status, text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                text,
            });
        }

        debug!("EmailJS accepted message: status={}", status);
        Ok(TransportResponse {
            status: status.as_u16(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn test_request_body_shape() {
        let payload = EmailPayload {
            from_name: "Ada".to_string(),
            from_email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "A message long enough to pass.".to_string(),
            company: "Not specified".to_string(),
            to_email: "owner@example.com".to_string(),
            reply_to: "ada@example.com".to_string(),
        };
        let body = EmailJsRequest {
            service_id: "svc",
            template_id: "tpl",
            user_id: "pk",
            template_params: &payload,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["service_id"], "svc");
        assert_eq!(json["user_id"], "pk");
        assert_eq!(json["template_params"]["reply_to"], "ada@example.com");
    }

    #[test]
    fn test_status_error_exposes_status() {
        let err = TransportError::Status {
            status: 429,
            text: "Too Many Requests".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(TransportError::Other("boom".to_string()).status(), None);
    }

    /// Reads one request, answers with a status line whose body is cut short.
    async fn serve_truncated_body(listener: TcpListener) {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    }

    fn empty_payload() -> EmailPayload {
        EmailPayload {
            from_name: String::new(),
            from_email: String::new(),
            subject: String::new(),
            message: String::new(),
            company: String::new(),
            to_email: String::new(),
            reply_to: String::new(),
        }
    }

    #[tokio::test]
    async fn test_unreadable_body_keeps_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_truncated_body(listener));

        let client = EmailJsClient::with_endpoint("pk".to_string(), format!("http://{addr}/send"))
            .unwrap();
        let response = client.send("svc", "tpl", &empty_payload()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text, "");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client =
            EmailJsClient::with_endpoint("pk".to_string(), "http://127.0.0.1:9/send".to_string())
                .unwrap();
        let err = client.send("svc", "tpl", &empty_payload()).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
        assert_eq!(err.status(), None);
    }
}
