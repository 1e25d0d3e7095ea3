//! Submission pipeline: sanitize, map to the provider payload, send, record,
//! classify.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::contact::audit::{AuditEntry, SubmissionLog};
use crate::contact::validation::ContactFormData;
use crate::email_client::connectivity::Connectivity;
use crate::email_client::{EmailPayload, EmailTransport, TransportError, TransportResponse};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const OFFLINE_MESSAGE: &str = "Please check your internet connection and try again.";
pub const BAD_REQUEST_MESSAGE: &str =
    "There was an issue with your message. Please check all fields and try again.";
pub const AUTH_MESSAGE: &str = "Authentication failed. Please try again later.";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable. Please try again later.";
pub const RATE_LIMITED_MESSAGE: &str =
    "Too many requests. Please wait a moment before trying again.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to send message. Please try again or use alternative contact methods below.";
pub const UNEXPECTED_MESSAGE: &str =
    "An unexpected error occurred. Please try again or use the alternative contact methods below.";

const UNSPECIFIED_COMPANY: &str = "Not specified";

/// Provider identifiers plus the mailbox that receives contact mail.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub to_email: String,
}

impl EmailConfig {
    pub fn is_complete(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Offline,
    BadRequest,
    Unauthorized,
    Unavailable,
    RateLimited,
    ServerError,
    Unknown,
}

impl FailureKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400) => FailureKind::BadRequest,
            Some(401) => FailureKind::Unauthorized,
            Some(403) => FailureKind::Unavailable,
            Some(429) => FailureKind::RateLimited,
            Some(500) | Some(502) | Some(503) => FailureKind::ServerError,
            _ => FailureKind::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::Offline => OFFLINE_MESSAGE,
            FailureKind::BadRequest => BAD_REQUEST_MESSAGE,
            FailureKind::Unauthorized => AUTH_MESSAGE,
            FailureKind::Unavailable => UNAVAILABLE_MESSAGE,
            FailureKind::RateLimited => RATE_LIMITED_MESSAGE,
            FailureKind::ServerError => SERVER_ERROR_MESSAGE,
            FailureKind::Unknown => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// Connectivity wins over the status code.
pub fn classify_failure(online: bool, error: &TransportError) -> FailureKind {
    if !online {
        return FailureKind::Offline;
    }
    FailureKind::from_status(error.status())
}

#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TransportResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

/// Failures raised before the transport is reached.
#[derive(Debug, Error)]
pub enum EmailServiceError {
    #[error("email service is not configured")]
    NotConfigured,
}

/// Maps sanitized form data onto the provider's template fields.
pub fn format_email_payload(data: &ContactFormData, to_email: &str) -> EmailPayload {
    let sanitized = data.sanitized();
    let company = if sanitized.company.is_empty() {
        UNSPECIFIED_COMPANY.to_string()
    } else {
        sanitized.company
    };

    EmailPayload {
        from_name: sanitized.name,
        reply_to: sanitized.email.clone(),
        from_email: sanitized.email,
        subject: sanitized.subject,
        message: sanitized.message,
        company,
        to_email: to_email.to_string(),
    }
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    transport: Arc<dyn EmailTransport>,
    log: Arc<dyn SubmissionLog>,
    connectivity: Arc<dyn Connectivity>,
}

impl EmailService {
    pub fn new(
        config: EmailConfig,
        transport: Arc<dyn EmailTransport>,
        log: Arc<dyn SubmissionLog>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            config,
            transport,
            log,
            connectivity,
        }
    }

    pub fn log(&self) -> &Arc<dyn SubmissionLog> {
        &self.log
    }

    /// Sends one contact message.
    ///
    /// Transport failures are classified into `SendOutcome { success: false }`;
    /// only failures before the transport call surface as `Err`.
    pub async fn send_contact(
        &self,
        data: &ContactFormData,
    ) -> Result<SendOutcome, EmailServiceError> {
        if !self.config.is_complete() {
            return Err(EmailServiceError::NotConfigured);
        }

        let payload = format_email_payload(data, &self.config.to_email);

        match self
            .transport
            .send(&self.config.service_id, &self.config.template_id, &payload)
            .await
        {
            Ok(response) => {
                info!("Contact message delivered: status={}", response.status);
                self.record(AuditEntry::success(data, response.status)).await;
                Ok(SendOutcome {
                    success: true,
                    message: SUCCESS_MESSAGE.to_string(),
                    data: Some(response),
                    failure: None,
                })
            }
            Err(e) => {
                let online = self.connectivity.is_online().await;
                let kind = classify_failure(online, &e);
                warn!("Contact message failed ({:?}): {}", kind, e);
                self.record(AuditEntry::failure(data, &e)).await;
                Ok(SendOutcome {
                    success: false,
                    message: kind.message().to_string(),
                    data: None,
                    failure: Some(kind),
                })
            }
        }
    }

    async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.log.append(entry).await {
            error!("Failed to record contact submission: {e}");
        }
    }
}
