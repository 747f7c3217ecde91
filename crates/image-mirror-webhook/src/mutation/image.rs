use tracing::warn;

use crate::errors::RewriteError;

const DIGEST_MARKER: &str = "@sha256:";

/// Returns `true` when `image` does not point to the private registry yet.
///
/// This is a plain, case-sensitive prefix match. It is what keeps the
/// webhook idempotent when the same Pod is admitted more than once.
pub fn should_rewrite(image: &str, private_registry: &str) -> bool {
    !image.starts_with(private_registry)
}

/// Compute the mirrored reference of `image`.
///
/// Images already served by the private registry are returned unchanged.
/// Otherwise the digest, if any, is dropped and the image is prefixed with
/// `<private_registry>/<public_project>/`. The join is not normalized and the
/// result is not validated.
pub fn rewrite(image: &str, private_registry: &str, public_project: &str) -> String {
    if !should_rewrite(image, private_registry) {
        return image.to_owned();
    }

    let image = match image.find(DIGEST_MARKER) {
        Some(idx) => {
            // The mirror is addressed by tag: the digest pin is lost here.
            warn!(image, "dropping digest from image reference");
            &image[..idx]
        }
        None => image,
    };

    format!("{private_registry}/{public_project}/{image}")
}

/// Routing configuration of the webhook: where public images are mirrored.
///
/// Built once at startup and shared read-only between all the requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryMirror {
    private_registry: String,
    public_project: String,
}

impl RegistryMirror {
    pub fn new(
        private_registry: impl Into<String>,
        public_project: impl Into<String>,
    ) -> Result<Self, RewriteError> {
        let private_registry = private_registry.into();
        let public_project = public_project.into();

        if private_registry.is_empty() || public_project.is_empty() {
            return Err(RewriteError::ConfigurationMissing);
        }

        Ok(RegistryMirror {
            private_registry,
            public_project,
        })
    }

    /// Same as `new`, but accepts values that might not have been provided at all.
    pub fn from_settings(
        private_registry: Option<&str>,
        public_project: Option<&str>,
    ) -> Result<Self, RewriteError> {
        match (private_registry, public_project) {
            (Some(registry), Some(project)) => RegistryMirror::new(registry, project),
            _ => Err(RewriteError::ConfigurationMissing),
        }
    }

    pub fn private_registry(&self) -> &str {
        &self.private_registry
    }

    pub fn public_project(&self) -> &str {
        &self.public_project
    }

    pub fn should_rewrite(&self, image: &str) -> bool {
        should_rewrite(image, &self.private_registry)
    }

    pub fn rewrite(&self, image: &str) -> String {
        rewrite(image, &self.private_registry, &self.public_project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::docker_hub_short_name("nginx:latest", "reg.internal/mirror/nginx:latest")]
    #[case::no_tag("busybox", "reg.internal/mirror/busybox")]
    #[case::other_registry(
        "quay.io/prometheus/node-exporter:v1.8.0",
        "reg.internal/mirror/quay.io/prometheus/node-exporter:v1.8.0"
    )]
    #[case::digest_pinned(
        "public.io/app:1.0@sha256:abcd1234",
        "reg.internal/mirror/public.io/app:1.0"
    )]
    #[case::digest_without_tag(
        "nginx@sha256:0d17b565c37bcbd895e9d92315a05c1c3c9a29f762b011a10c54a66cd53c9b31",
        "reg.internal/mirror/nginx"
    )]
    #[case::no_separator_normalization("/nginx", "reg.internal/mirror//nginx")]
    #[case::empty_image("", "reg.internal/mirror/")]
    fn rewrite_public_images(#[case] image: &str, #[case] expected: &str) {
        assert!(should_rewrite(image, "reg.internal"));
        assert_eq!(rewrite(image, "reg.internal", "mirror"), expected);
    }

    #[rstest]
    #[case::mirrored("reg.internal/mirror/nginx:latest")]
    #[case::other_project("reg.internal/team/app:2.1")]
    #[case::digest_is_kept("reg.internal/mirror/app@sha256:abcd")]
    #[case::plain_prefix_match("reg.internalx/app")]
    fn private_images_are_left_alone(#[case] image: &str) {
        assert!(!should_rewrite(image, "reg.internal"));
        assert_eq!(rewrite(image, "reg.internal", "mirror"), image);
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        assert!(should_rewrite("REG.INTERNAL/mirror/nginx", "reg.internal"));
    }

    #[rstest]
    #[case("nginx:latest")]
    #[case("public.io/app:1.0@sha256:abcd1234")]
    #[case("reg.internal/mirror/redis:7")]
    fn rewrite_is_idempotent(#[case] image: &str) {
        let mirror = RegistryMirror::new("reg.internal", "mirror").unwrap();

        let once = mirror.rewrite(image);
        assert!(!mirror.should_rewrite(&once));
        assert_eq!(mirror.rewrite(&once), once);
    }

    #[rstest]
    #[case::no_registry(None, Some("mirror"))]
    #[case::no_project(Some("reg.internal"), None)]
    #[case::empty_registry(Some(""), Some("mirror"))]
    #[case::empty_project(Some("reg.internal"), Some(""))]
    #[case::nothing(None, None)]
    fn incomplete_configuration(#[case] registry: Option<&str>, #[case] project: Option<&str>) {
        assert_eq!(
            RegistryMirror::from_settings(registry, project),
            Err(RewriteError::ConfigurationMissing)
        );
    }

    #[test]
    fn complete_configuration() {
        let mirror = RegistryMirror::from_settings(Some("reg.internal"), Some("mirror"))
            .expect("configuration should be accepted");
        assert_eq!(mirror.private_registry(), "reg.internal");
        assert_eq!(mirror.public_project(), "mirror");
    }
}
