use axum::{
    body::Bytes,
    extract,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error, warn, Span};

use crate::{
    admission_request::AdmissionRequest,
    api::{
        admission_review::{self, AdmissionReviewResponse},
        api_error::ApiError,
        state::ApiServerState,
    },
    errors::MutationError,
    mutation::{self, MutationOutcome},
};

pub(crate) const ROOT_BANNER: &str = "image-mirror-webhook is running";

#[tracing::instrument(
    name = "mutation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        name=tracing::field::Empty,
        namespace=tracing::field::Empty,
        operation=tracing::field::Empty,
        kind=tracing::field::Empty,
        resource=tracing::field::Empty,
        allowed=tracing::field::Empty,
        mutated=tracing::field::Empty,
        patch_operations=tracing::field::Empty,
    ),
    skip_all)]
/// Redirect the images of the submitted Pod to the private registry mirror.
pub(crate) async fn mutate_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    debug!(body = %String::from_utf8_lossy(&body), "admission review received");

    let admission_request =
        admission_review::decode(&body).map_err(|e| handle_mutation_error(e.into()))?;

    populate_span_with_admission_request_data(&admission_request);

    let outcome = mutation::mutate(&admission_request, state.mirror.as_ref())
        .map_err(handle_mutation_error)?;

    populate_span_with_mutation_results(&outcome);

    let payload = admission_review::encode(&AdmissionReviewResponse::new(outcome.response))
        .map_err(|e| handle_mutation_error(e.into()))?;

    debug!(response = %String::from_utf8_lossy(&payload), "admission review response");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
        payload,
    ))
}

pub(crate) async fn root_handler() -> &'static str {
    ROOT_BANNER
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("kind", adm_req.kind.kind.as_str());
    Span::current().record("resource", adm_req.resource.resource.as_str());
    Span::current().record("name", adm_req.name.as_deref().unwrap_or_default());
    Span::current().record(
        "namespace",
        adm_req.namespace.as_deref().unwrap_or_default(),
    );
    Span::current().record("operation", adm_req.operation.as_str());
}

fn populate_span_with_mutation_results(outcome: &MutationOutcome) {
    Span::current().record("allowed", outcome.response.allowed);
    Span::current().record("mutated", !outcome.patches.is_empty());
    Span::current().record("patch_operations", outcome.patches.len());
    for patch in &outcome.patches {
        debug!(%patch, "JSON patch operation");
    }
}

fn handle_mutation_error(error: MutationError) -> ApiError {
    match &error {
        MutationError::Decode(_) | MutationError::Extract(_) => {
            warn!(error = %error, "rejecting admission review");
        }
        MutationError::Rewrite(_) | MutationError::Encode(_) => {
            error!(error = %error, "cannot process admission review");
        }
    }

    ApiError::from(error)
}
