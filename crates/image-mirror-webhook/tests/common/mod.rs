use axum::Router;
use image_mirror_webhook::{
    config::{Config, KubeConfigSource, MirrorConfig, TlsConfig},
    WebhookServer,
};
use std::{net::SocketAddr, path::PathBuf};

pub(crate) const PRIVATE_REGISTRY: &str = "reg.internal";
pub(crate) const PUBLIC_PROJECT: &str = "mirror";

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 8443)),
        tls_config: TlsConfig {
            cert_file: PathBuf::from("/etc/webhook/certs/tls.crt"),
            key_file: PathBuf::from("/etc/webhook/certs/tls.key"),
        },
        mirror: MirrorConfig {
            private_registry: Some(PRIVATE_REGISTRY.to_owned()),
            public_project: Some(PUBLIC_PROJECT.to_owned()),
        },
        kube_config_source: KubeConfigSource::InCluster,
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) fn app(config: Config) -> Router {
    WebhookServer::new_from_config(config).router()
}
