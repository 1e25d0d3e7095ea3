//! Page-level submission state machine.
//!
//! ```text
//! Idle --submit(valid)--> Loading --ok--> Success --close--> Idle
//!                                 \--fail--> Error --retry|dismiss--> Idle
//! ```
//! A successful send resets the form; a failed one keeps what was typed.

use serde::Serialize;
use tracing::error;

use crate::contact::fallback::{fallback_contact_info, FallbackContactInfo};
use crate::contact::form::ContactForm;
use crate::contact::service::{EmailService, UNEXPECTED_MESSAGE};
use crate::contact::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Another submission is in flight or its result has not been acknowledged.
    NotIdle(SubmissionStatus),
    Invalid(FieldErrors),
}

#[derive(Default)]
pub struct ContactSession {
    form: ContactForm,
    status: SubmissionStatus,
    error_message: Option<String>,
    fallback: Option<FallbackContactInfo>,
}

impl ContactSession {
    pub fn new(form: ContactForm) -> Self {
        Self {
            form,
            status: SubmissionStatus::Idle,
            error_message: None,
            fallback: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn fallback_info(&self) -> Option<&FallbackContactInfo> {
        self.fallback.as_ref()
    }

    /// Validates, sends and records the outcome. Transport and unexpected
    /// failures both end in `Error` with fallback contacts attached.
    pub async fn submit(
        &mut self,
        service: &EmailService,
    ) -> Result<SubmissionStatus, SubmitRejection> {
        if self.status != SubmissionStatus::Idle {
            return Err(SubmitRejection::NotIdle(self.status));
        }
        if !self.form.validate_entire_form() {
            return Err(SubmitRejection::Invalid(self.form.errors()));
        }

        self.status = SubmissionStatus::Loading;
        self.error_message = None;
        self.fallback = None;
        self.form.set_submitting(true);

        let data = self.form.data();
        match service.send_contact(&data).await {
            Ok(outcome) if outcome.success => {
                self.status = SubmissionStatus::Success;
                self.form.reset();
            }
            Ok(outcome) => self.fail(outcome.message),
            Err(e) => {
                error!("Contact form submission error: {e}");
                self.fail(UNEXPECTED_MESSAGE.to_string());
            }
        }
        self.form.set_submitting(false);

        Ok(self.status)
    }

    /// Dismisses the success confirmation.
    pub fn close_success(&mut self) {
        if self.status == SubmissionStatus::Success {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Clears the error so the visitor can send again; form data is kept.
    pub fn retry(&mut self) {
        self.clear_error();
    }

    pub fn dismiss_error(&mut self) {
        self.clear_error();
    }

    fn fail(&mut self, message: String) {
        self.status = SubmissionStatus::Error;
        self.error_message = Some(message);
        self.fallback = Some(fallback_contact_info());
    }

    fn clear_error(&mut self) {
        if self.status == SubmissionStatus::Error {
            self.status = SubmissionStatus::Idle;
            self.error_message = None;
            self.fallback = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::contact::audit::SubmissionLog;
    use crate::contact::rules::FieldName;
    use crate::contact::service::test_support::{config, service_with, valid_form, StubTransport};
    use crate::contact::service::{EmailConfig, RATE_LIMITED_MESSAGE};
    use crate::contact::validation::ContactFormData;
    use crate::email_client::connectivity::StaticConnectivity;

    fn filled_session() -> ContactSession {
        let session = ContactSession::default();
        let data = valid_form();
        for field in FieldName::ALL {
            session.form().handle_field_change(field, data.get(field));
        }
        session
    }

    #[tokio::test]
    async fn test_success_resets_form() {
        let (service, _log) = service_with(Arc::new(StubTransport::ok()), true);
        let mut session = filled_session();

        assert_eq!(session.submit(&service).await, Ok(SubmissionStatus::Success));
        assert_eq!(session.form().data(), ContactFormData::default());
        assert!(!session.form().is_submitting());

        session.close_success();
        assert_eq!(session.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_data_and_attaches_fallback() {
        let (service, _log) = service_with(Arc::new(StubTransport::failing(429)), true);
        let mut session = filled_session();

        assert_eq!(session.submit(&service).await, Ok(SubmissionStatus::Error));
        assert_eq!(session.error_message(), Some(RATE_LIMITED_MESSAGE));
        assert!(session.fallback_info().is_some());
        assert_eq!(session.form().data(), valid_form());
    }

    #[tokio::test]
    async fn test_edits_do_not_clear_error_state() {
        let (service, _log) = service_with(Arc::new(StubTransport::failing(500)), true);
        let mut session = filled_session();
        session.submit(&service).await.unwrap();

        session.form().handle_field_change(FieldName::Company, "Acme");
        assert_eq!(session.status(), SubmissionStatus::Error);

        assert_eq!(
            session.submit(&service).await,
            Err(SubmitRejection::NotIdle(SubmissionStatus::Error))
        );

        session.retry();
        assert_eq!(session.status(), SubmissionStatus::Idle);
        assert!(session.fallback_info().is_none());
        assert_eq!(session.form().data().company, "Acme");
    }

    #[tokio::test]
    async fn test_invalid_form_stays_idle() {
        let (service, log) = service_with(Arc::new(StubTransport::ok()), true);
        let mut session = ContactSession::default();

        match session.submit(&service).await {
            Err(SubmitRejection::Invalid(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.status(), SubmissionStatus::Idle);
        assert!(log.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_failure_uses_generic_message() {
        let (service, _log) = service_with(Arc::new(StubTransport::ok()), true);
        let broken = EmailService::new(
            EmailConfig {
                service_id: String::new(),
                ..config()
            },
            Arc::new(StubTransport::ok()),
            Arc::clone(service.log()),
            Arc::new(StaticConnectivity(true)),
        );
        let mut session = filled_session();

        assert_eq!(session.submit(&broken).await, Ok(SubmissionStatus::Error));
        assert_eq!(session.error_message(), Some(UNEXPECTED_MESSAGE));
        assert!(session.fallback_info().is_some());

        session.dismiss_error();
        assert_eq!(session.status(), SubmissionStatus::Idle);
    }
}
