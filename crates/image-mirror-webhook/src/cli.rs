use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};

pub const DEFAULT_CERT_FILE: &str = "/etc/webhook/certs/tls.crt";
pub const DEFAULT_KEY_FILE: &str = "/etc/webhook/certs/tls.key";

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("MIRROR_WEBHOOK_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("MIRROR_WEBHOOK_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("MIRROR_WEBHOOK_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("8443")
            .env("MIRROR_WEBHOOK_PORT")
            .help("Webhook server port"),
        Arg::new("tls-cert-file")
            .long("tls-cert-file")
            .alias("tlsCertFile")
            .value_name("CERT_FILE")
            .default_value(DEFAULT_CERT_FILE)
            .env("MIRROR_WEBHOOK_TLS_CERT_FILE")
            .help("File containing the x509 Certificate for HTTPS"),
        Arg::new("tls-key-file")
            .long("tls-key-file")
            .alias("tlsKeyFile")
            .value_name("KEY_FILE")
            .default_value(DEFAULT_KEY_FILE)
            .env("MIRROR_WEBHOOK_TLS_KEY_FILE")
            .help("File containing the x509 private key to --tls-cert-file"),
        Arg::new("private-registry")
            .long("private-registry")
            .value_name("REGISTRY")
            .env("PRIVATE_REGISTRY")
            .required(false)
            .help("Host of the private registry that mirrors public images"),
        Arg::new("public-project")
            .long("public-project")
            .value_name("PROJECT")
            .env("PUBLIC_PROJECT")
            .required(false)
            .help("Path inside of the private registry holding the mirrored images"),
        Arg::new("use-kubeconfig")
            .long("use-kubeconfig")
            .value_name("USE_KUBECONFIG")
            .env("USE_KUBECONFIG")
            .num_args(0..=1)
            .default_missing_value("true")
            .required(false)
            .help("Connect to Kubernetes using a kubeconfig file instead of the in-cluster credentials"),
        Arg::new("kubeconfig")
            .long("kubeconfig")
            .value_name("KUBECONFIG")
            .env("KUBECONFIG")
            .required(false)
            .help("Path to the kubeconfig file, defaults to ~/.kube/config. Used only together with --use-kubeconfig"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
