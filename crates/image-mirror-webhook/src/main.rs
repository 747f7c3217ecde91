use anyhow::{anyhow, Result};
use tracing::{debug, info};

use image_mirror_webhook::{
    cli, config::Config, kube_client, tracing::setup_tracing, WebhookServer,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    // Starting from rustls 0.22, each application must set its default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Cannot install the rustls crypto provider"))?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;
    debug!("tracing system ready");

    // The webhook does not talk with the API server, but it must not start
    // when the cluster credentials are broken.
    let _client = kube_client::connect(&config.kube_config_source).await?;

    let server = WebhookServer::new_from_config(config);
    server.run().await?;

    info!("webhook server stopped");
    Ok(())
}
