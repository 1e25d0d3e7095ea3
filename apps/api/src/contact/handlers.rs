use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::contact::fallback::{
    ContactInfo, ContactMethod, FallbackContactInfo, CONTACT_INFO, CONTACT_METHODS,
};
use crate::contact::form::ContactForm;
use crate::contact::rules::FieldName;
use crate::contact::service::SUCCESS_MESSAGE;
use crate::contact::session::{ContactSession, SubmissionStatus, SubmitRejection};
use crate::contact::validation::{text_or_empty, validate_named_field, ContactFormData};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct FieldValidationResponse {
    pub valid: bool,
    pub errors: BTreeMap<String, &'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmitResponse {
    pub status: SubmissionStatus,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackContactInfo>,
}

#[derive(Serialize)]
pub struct ContactMethodsResponse {
    pub methods: &'static [ContactMethod],
    pub info: ContactInfo,
}

/// Unparseable bodies get the usual JSON error shape instead of axum's
/// plain-text rejection.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /api/v1/contact/validate
/// Checks only the fields present in the body; names outside the form pass.
/// Non-string values are validated as empty.
pub async fn handle_validate_fields(
    payload: Result<Json<BTreeMap<String, Value>>, JsonRejection>,
) -> Result<Json<FieldValidationResponse>, AppError> {
    let fields = json_body(payload)?;
    let errors: BTreeMap<String, &'static str> = fields
        .iter()
        .filter_map(|(name, value)| {
            validate_named_field(name, text_or_empty(value)).map(|e| (name.clone(), e))
        })
        .collect();
    Ok(Json(FieldValidationResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// POST /api/v1/contact
/// Invalid forms get 422; send failures come back as 200 with fallback contacts.
pub async fn handle_submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactFormData>, JsonRejection>,
) -> Result<Json<ContactSubmitResponse>, AppError> {
    let data = json_body(payload)?;
    let form = ContactForm::new();
    for field in FieldName::ALL {
        form.handle_field_change(field, data.get(field));
    }
    let mut session = ContactSession::new(form);

    let status = match session.submit(&state.email).await {
        Ok(status) => status,
        Err(SubmitRejection::Invalid(errors)) => return Err(AppError::Validation(errors)),
        Err(SubmitRejection::NotIdle(status)) => {
            error!("Fresh contact session was not idle: {status:?}");
            return Err(AppError::Internal(anyhow::anyhow!(
                "contact session busy ({status:?})"
            )));
        }
    };

    let success = status == SubmissionStatus::Success;
    Ok(Json(ContactSubmitResponse {
        status,
        success,
        message: session
            .error_message()
            .unwrap_or(SUCCESS_MESSAGE)
            .to_string(),
        fallback: session.fallback_info().cloned(),
    }))
}

/// GET /api/v1/contact/methods
pub async fn handle_contact_methods() -> Json<ContactMethodsResponse> {
    Json(ContactMethodsResponse {
        methods: CONTACT_METHODS,
        info: CONTACT_INFO,
    })
}
