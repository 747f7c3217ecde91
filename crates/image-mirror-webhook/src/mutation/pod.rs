use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::Deserialize;

use crate::errors::ExtractError;

/// The two lists of a Pod that carry container images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerList {
    Containers,
    InitContainers,
}

impl ContainerList {
    /// Name of the list inside of `spec`, as found in the JSON document.
    pub fn json_field(&self) -> &'static str {
        match self {
            ContainerList::Containers => "containers",
            ContainerList::InitContainers => "initContainers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    /// Position of the container inside of its list
    pub index: usize,
    pub image: Option<String>,
}

/// The subset of a Pod the webhook cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodImages {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub containers: Vec<ContainerImage>,
    pub init_containers: Vec<ContainerImage>,
}

/// Read the Pod carried by an admission request.
///
/// Anything that is not a valid `v1/Pod` is rejected: that includes objects
/// of a different kind and containers missing a required field such as
/// `name`, not just corrupted payloads.
pub fn extract_pod(raw_object: Option<&RawExtension>) -> Result<PodImages, ExtractError> {
    let raw_object = raw_object.ok_or(ExtractError::MissingObject)?;
    let pod = Pod::deserialize(&raw_object.0).map_err(ExtractError::Unmarshal)?;

    let (containers, init_containers) = match pod.spec {
        Some(spec) => (
            container_images(spec.containers),
            container_images(spec.init_containers.unwrap_or_default()),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(PodImages {
        name: pod.metadata.name,
        namespace: pod.metadata.namespace,
        containers,
        init_containers,
    })
}

fn container_images(containers: Vec<Container>) -> Vec<ContainerImage> {
    containers
        .into_iter()
        .enumerate()
        .map(|(index, container)| ContainerImage {
            index,
            image: container.image,
        })
        .collect()
}
