use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::image::RegistryMirror;
use super::pod::{ContainerImage, ContainerList, PodImages};

/// JSON Patch operations produced by the webhook. Images are only ever
/// replaced in place.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Replace,
}

/// A single RFC 6902 operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: String,
}

impl PatchOperation {
    pub fn replace_image(path: String, image: String) -> Self {
        PatchOperation {
            op: PatchOp::Replace,
            path,
            value: image,
        }
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "replace {} = {}", self.path, self.value)
    }
}

/// Positional pointer to the image of a container, e.g. `/spec/containers/2/image`
pub fn image_path(list: ContainerList, index: usize) -> String {
    format!("/spec/{}/{}/image", list.json_field(), index)
}

/// Walk `containers` then `initContainers`, in declaration order, and emit
/// one `replace` operation for every image that has to be redirected to the
/// mirror. The order of the returned operations matches the traversal order.
pub fn build_patches(pod: &PodImages, mirror: &RegistryMirror) -> Vec<PatchOperation> {
    let containers = pod
        .containers
        .iter()
        .map(|container| (ContainerList::Containers, container));
    let init_containers = pod
        .init_containers
        .iter()
        .map(|container| (ContainerList::InitContainers, container));

    containers
        .chain(init_containers)
        .filter_map(|(list, container)| patch_for_container(list, container, mirror))
        .collect()
}

fn patch_for_container(
    list: ContainerList,
    container: &ContainerImage,
    mirror: &RegistryMirror,
) -> Option<PatchOperation> {
    let image = container.image.as_deref()?;
    if !mirror.should_rewrite(image) {
        return None;
    }

    let new_image = mirror.rewrite(image);
    info!(
        container_list = list.json_field(),
        index = container.index,
        image,
        new_image = new_image.as_str(),
        "mutating container image"
    );

    Some(PatchOperation::replace_image(
        image_path(list, container.index),
        new_image,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mirror() -> RegistryMirror {
        RegistryMirror::new("reg.internal", "mirror").unwrap()
    }

    fn containers(images: &[Option<&str>]) -> Vec<ContainerImage> {
        images
            .iter()
            .enumerate()
            .map(|(index, image)| ContainerImage {
                index,
                image: image.map(str::to_owned),
            })
            .collect()
    }

    fn pod(containers_images: &[Option<&str>], init_images: &[Option<&str>]) -> PodImages {
        PodImages {
            name: Some("web".to_owned()),
            namespace: Some("default".to_owned()),
            containers: containers(containers_images),
            init_containers: containers(init_images),
        }
    }

    #[rstest]
    #[case::container(ContainerList::Containers, 2, "/spec/containers/2/image")]
    #[case::init_container(ContainerList::InitContainers, 0, "/spec/initContainers/0/image")]
    fn positional_pointer(#[case] list: ContainerList, #[case] index: usize, #[case] expected: &str) {
        assert_eq!(image_path(list, index), expected);
    }

    #[test]
    fn sparse_patch() {
        let pod = pod(
            &[
                Some("reg.internal/mirror/redis:7"),
                Some("nginx:latest"),
                Some("reg.internal/tools/sidecar:1.2"),
            ],
            &[],
        );

        let patches = build_patches(&pod, &mirror());

        assert_eq!(
            patches,
            vec![PatchOperation::replace_image(
                "/spec/containers/1/image".to_owned(),
                "reg.internal/mirror/nginx:latest".to_owned(),
            )]
        );
    }

    #[test]
    fn order_matches_declaration_order() {
        let pod = pod(
            &[
                Some("nginx:latest"),
                Some("reg.internal/mirror/redis:7"),
                Some("quay.io/prometheus/node-exporter:v1.8.0"),
            ],
            &[Some("busybox"), Some("alpine:3.20")],
        );

        let paths: Vec<String> = build_patches(&pod, &mirror())
            .into_iter()
            .map(|patch| patch.path)
            .collect();

        assert_eq!(
            paths,
            vec![
                "/spec/containers/0/image",
                "/spec/containers/2/image",
                "/spec/initContainers/0/image",
                "/spec/initContainers/1/image",
            ]
        );
    }

    #[test]
    fn init_containers_are_rewritten() {
        let pod = pod(
            &[Some("reg.internal/mirror/app:1.0")],
            &[Some("busybox@sha256:1ff6c18fbef2045af6b9c16bf034cc421a29027b800e4f9b68ae9b1cb3e9ae07")],
        );

        let patches = build_patches(&pod, &mirror());

        assert_eq!(
            patches,
            vec![PatchOperation::replace_image(
                "/spec/initContainers/0/image".to_owned(),
                "reg.internal/mirror/busybox".to_owned(),
            )]
        );
    }

    #[test]
    fn compliant_pod_produces_no_patches() {
        let pod = pod(
            &[Some("reg.internal/mirror/nginx:latest")],
            &[Some("reg.internal/mirror/busybox")],
        );

        assert!(build_patches(&pod, &mirror()).is_empty());
    }

    #[test]
    fn containers_without_image_are_skipped() {
        let pod = pod(&[None, Some("nginx")], &[]);

        let patches = build_patches(&pod, &mirror());

        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].path, "/spec/containers/1/image");
    }

    #[test]
    fn serialized_operation() {
        let patch = PatchOperation::replace_image(
            "/spec/containers/0/image".to_owned(),
            "reg.internal/mirror/nginx".to_owned(),
        );

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({
                "op": "replace",
                "path": "/spec/containers/0/image",
                "value": "reg.internal/mirror/nginx",
            })
        );
    }
}
