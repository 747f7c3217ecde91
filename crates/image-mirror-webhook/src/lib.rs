pub mod admission_request;
pub mod admission_response;
pub mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod errors;
pub mod kube_client;
pub mod mutation;
pub mod tracing;

use ::tracing::{info, warn};
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::api::{
    handlers::{mutate_handler, readiness_handler, root_handler},
    state::ApiServerState,
};
use crate::config::{Config, TlsConfig};

/// Largest request body accepted by the Kubernetes API server. An UPDATE
/// review carries both the old and the new object, so it can be twice as
/// large as the biggest object stored inside of etcd.
pub const MAX_ADMISSION_REVIEW_SIZE: usize = 3 * 1024 * 1024;

pub struct WebhookServer {
    router: Router,
    addr: SocketAddr,
    tls_config: TlsConfig,
}

impl WebhookServer {
    pub fn new_from_config(config: Config) -> Self {
        let mirror = config.mirror.registry_mirror();
        match &mirror {
            Some(mirror) => info!(
                private_registry = mirror.private_registry(),
                public_project = mirror.public_project(),
                "registry mirror configured"
            ),
            None => warn!(
                "private registry or public project are not set, all the admission requests are going to be refused"
            ),
        }

        let state = Arc::new(ApiServerState { mirror });

        let router = Router::new()
            .route("/", get(root_handler))
            .route("/mutate", post(mutate_handler))
            .route("/readiness", get(readiness_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(MAX_ADMISSION_REVIEW_SIZE))
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            addr: config.addr,
            tls_config: config.tls_config,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(self) -> Result<()> {
        let rustls_config =
            certs::create_tls_config_and_watch_certificate_changes(self.tls_config).await?;

        info!(address = self.addr.to_string().as_str(), "started HTTPS server");
        axum_server::bind_rustls(self.addr, rustls_config)
            .serve(self.router.into_make_service())
            .await?;

        Ok(())
    }
}
