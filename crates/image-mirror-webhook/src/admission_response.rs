use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::errors::EncodeError;
use crate::mutation::PatchOperation;

/// This models the admission/v1/AdmissionResponse object of Kubernetes, limited
/// to the fields a mutating webhook that never denies requests has to set.
/// See https://pkg.go.dev/k8s.io/kubernetes/pkg/apis/admission#AdmissionResponse
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// UID is an identifier for the individual request/response.
    /// This must be copied over from the corresponding AdmissionRequest.
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    pub allowed: bool,

    /// The type of Patch. Currently we only allow "JSONPatch".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// The patch body, base64 encoded. Currently we only support "JSONPatch"
    /// which implements RFC 6902.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

impl AdmissionResponse {
    /// Build the response for a mutation. The webhook never rejects objects,
    /// so `allowed` is always set. An empty list of operations produces a
    /// plain pass-through response without any patch.
    pub fn from_patch_operations(
        uid: String,
        patches: &[PatchOperation],
    ) -> Result<AdmissionResponse, EncodeError> {
        if patches.is_empty() {
            return Ok(AdmissionResponse {
                uid,
                allowed: true,
                ..Default::default()
            });
        }

        let patch = serde_json::to_vec(patches)
            .map(|bytes| general_purpose::STANDARD.encode(bytes))
            .map_err(EncodeError::Patch)?;

        Ok(AdmissionResponse {
            uid,
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(patch),
        })
    }

    /// Decode the `patch` field back into the list of operations it carries.
    pub fn patch_operations(&self) -> Option<Vec<PatchOperation>> {
        let patch = self.patch.as_ref()?;
        let bytes = general_purpose::STANDARD.decode(patch).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
