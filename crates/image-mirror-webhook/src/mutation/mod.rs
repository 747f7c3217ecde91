mod image;
mod patch;
mod pod;

pub use image::{rewrite, should_rewrite, RegistryMirror};
pub use patch::{build_patches, image_path, PatchOp, PatchOperation};
pub use pod::{extract_pod, ContainerImage, ContainerList, PodImages};

use tracing::debug;

use crate::admission_request::AdmissionRequest;
use crate::admission_response::AdmissionResponse;
use crate::errors::{Result, RewriteError};

/// Result of the mutation of a single admission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub response: AdmissionResponse,
    /// The operations carried, encoded, by `response.patch`
    pub patches: Vec<PatchOperation>,
}

/// Compute the response to an admission request.
///
/// The Pod is extracted before the routing configuration is looked at:
/// a broken request is reported as such even when the webhook is
/// misconfigured. Without a mirror no patch is computed at all.
pub fn mutate(
    request: &AdmissionRequest,
    mirror: Option<&RegistryMirror>,
) -> Result<MutationOutcome> {
    let pod = extract_pod(request.object.as_ref())?;
    debug!(
        pod_name = pod.name.as_deref().unwrap_or_default(),
        pod_namespace = pod.namespace.as_deref().unwrap_or_default(),
        "pod extracted"
    );

    let mirror = mirror.ok_or(RewriteError::ConfigurationMissing)?;
    let patches = build_patches(&pod, mirror);

    let response = AdmissionResponse::from_patch_operations(request.uid.clone(), &patches)?;

    Ok(MutationOutcome { response, patches })
}
