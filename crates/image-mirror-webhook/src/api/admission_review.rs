use crate::admission_request::AdmissionRequest;
use crate::admission_response::AdmissionResponse;
use crate::errors::{DecodeError, EncodeError};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Required, but checked explicitly by `decode` instead of relying
    /// on serde: a missing request is a different error than a broken document.
    #[serde(default)]
    pub request: Option<AdmissionRequest>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub response: AdmissionResponse,
}

impl AdmissionReviewResponse {
    pub fn new(response: AdmissionResponse) -> Self {
        AdmissionReviewResponse {
            api_version: Some(String::from("admission.k8s.io/v1")),
            kind: Some(String::from("AdmissionReview")),
            response,
        }
    }
}

/// Parse the body of an admission webhook call and return the request it carries.
pub fn decode(body: &[u8]) -> Result<AdmissionRequest, DecodeError> {
    let review: AdmissionReviewRequest =
        serde_json::from_slice(body).map_err(DecodeError::MalformedEnvelope)?;

    review.request.ok_or(DecodeError::MissingRequest)
}

pub fn encode(review: &AdmissionReviewResponse) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(review).map_err(EncodeError::Response)
}
