use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::mutation::RegistryMirror;

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: TlsConfig,
    pub mirror: MirrorConfig,
    pub kube_config_source: KubeConfigSource,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// Raw routing settings, as provided by the user. They are validated
/// when the server is built.
#[derive(Clone, Debug, Default)]
pub struct MirrorConfig {
    pub private_registry: Option<String>,
    pub public_project: Option<String>,
}

impl MirrorConfig {
    pub fn registry_mirror(&self) -> Option<RegistryMirror> {
        RegistryMirror::from_settings(
            self.private_registry.as_deref(),
            self.public_project.as_deref(),
        )
        .ok()
    }
}

/// Where the credentials used to talk with Kubernetes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KubeConfigSource {
    InCluster,
    /// A kubeconfig file. When no path is given the default location is used.
    Kubeconfig(Option<PathBuf>),
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        // init some variables based on the cli parameters
        let addr = api_bind_address(matches)?;
        let tls_config = tls_files(matches)?;

        let mirror = MirrorConfig {
            private_registry: non_empty_value(matches, "private-registry"),
            public_project: non_empty_value(matches, "public-project"),
        };

        let kube_config_source = if non_empty_value(matches, "use-kubeconfig").is_some() {
            KubeConfigSource::Kubeconfig(non_empty_value(matches, "kubeconfig").map(PathBuf::from))
        } else {
            KubeConfigSource::InCluster
        };

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            mirror,
            kube_config_source,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    let address = matches
        .get_one::<String>("address")
        .ok_or_else(|| anyhow!("error parsing arguments: bind address not set"))?;
    let port = matches
        .get_one::<String>("port")
        .ok_or_else(|| anyhow!("error parsing arguments: port not set"))?;

    format!("{address}:{port}")
        .parse()
        .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_files(matches: &ArgMatches) -> Result<TlsConfig> {
    let cert_file = non_empty_value(matches, "tls-cert-file");
    let key_file = non_empty_value(matches, "tls-key-file");

    match (cert_file, key_file) {
        (Some(cert_file), Some(key_file)) => Ok(TlsConfig {
            cert_file: PathBuf::from(cert_file),
            key_file: PathBuf::from(key_file),
        }),
        _ => Err(anyhow!(
            "error parsing arguments: both --tls-cert-file and --tls-key-file must be provided"
        )),
    }
}

fn non_empty_value(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .filter(|value| !value.is_empty())
        .cloned()
}
