use anyhow::{anyhow, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::info;

use crate::config::KubeConfigSource;

/// Build the configuration used to connect to Kubernetes, either from the
/// credentials mounted inside of the Pod or from a kubeconfig file.
pub async fn kube_config(source: &KubeConfigSource) -> Result<kube::Config> {
    match source {
        KubeConfigSource::InCluster => kube::Config::incluster()
            .map_err(|e| anyhow!("Cannot load in-cluster Kubernetes configuration: {e}")),
        KubeConfigSource::Kubeconfig(path) => {
            let kubeconfig = match path {
                Some(path) => {
                    info!(kubeconfig = %path.display(), "loading kubeconfig");
                    Kubeconfig::read_from(path)
                }
                None => Kubeconfig::read(),
            }
            .map_err(|e| anyhow!("Cannot read kubeconfig: {e}"))?;

            kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| anyhow!("Cannot load Kubernetes configuration from kubeconfig: {e}"))
        }
    }
}

/// Connect to Kubernetes and make sure the credentials work by asking
/// the API server for its version.
pub async fn connect(source: &KubeConfigSource) -> Result<kube::Client> {
    let config = kube_config(source).await?;
    let client = kube::Client::try_from(config)
        .map_err(|e| anyhow!("Cannot create Kubernetes client: {e}"))?;

    let version = client
        .apiserver_version()
        .await
        .map_err(|e| anyhow!("Cannot connect to Kubernetes cluster: {e}"))?;
    info!(
        version = version.git_version.as_str(),
        platform = version.platform.as_str(),
        "connected to Kubernetes"
    );

    Ok(client)
}
