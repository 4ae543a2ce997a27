//! Validating admission for App resources.
//!
//! Denials carry the rendered [`crate::error::Error`], which the API server reports to clients
//! behind [`crate::constants::APP_ADMISSION_CONTROLLER_TEXT`].
use kube::{
    ResourceExt,
    core::{
        DynamicObject,
        admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation},
    },
};
use tracing::instrument;

use crate::{crd::App, validation::Validator};

/// Validates the App of an admission request.
///
/// Deletions and requests without an object are always allowed.
#[instrument(skip_all, fields(uid = %request.uid, operation = ?request.operation))]
pub async fn review(validator: &Validator, request: &AdmissionRequest<App>) -> AdmissionResponse {
    let response = AdmissionResponse::from(request);

    if matches!(request.operation, Operation::Delete) {
        return response;
    }
    let Some(app) = &request.object else {
        return response;
    };

    match validator.validate_app(app).await {
        Ok(()) => response,
        Err(error) => {
            tracing::info!(app = %app.name_any(), %error, "denying app");
            response.deny(error.to_string())
        }
    }
}

/// Answers an [`AdmissionReview`] as received from the API server.
pub async fn handle_review(
    validator: &Validator,
    review: AdmissionReview<App>,
) -> AdmissionReview<DynamicObject> {
    let request: AdmissionRequest<App> = match review.try_into() {
        Ok(request) => request,
        Err(err) => {
            return AdmissionResponse::invalid(format!("failed to convert to request: {err}"))
                .into_review();
        }
    };

    self::review(validator, &request).await.into_review()
}
