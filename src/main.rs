use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pxetcd::{AppError, ServiceConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "pxetcd")]
#[command(version)]
#[command(about = "Render etcd bootstrap manifests from form parameters", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the input form and rendered manifests over HTTP (default)
    #[clap(visible_alias = "s")]
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        listen: Option<SocketAddr>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Render one manifest to stdout
    #[clap(visible_alias = "r")]
    Render {
        /// Value recorded as the manifest origin
        #[arg(long, default_value = "cli")]
        origin: String,
        #[command(flatten)]
        overrides: Overrides,
        /// Parameters as KEY=VALUE (e.g. i1=10.0.0.1 v=1.8.4)
        #[arg(value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
}

#[derive(Args)]
struct Overrides {
    /// Reject unrecognized parameters
    #[arg(long)]
    strict: bool,
    /// Portworx image tag
    #[arg(long)]
    image_tag: Option<String>,
    /// Manifest template, relative to the configured root
    #[arg(long)]
    template: Option<String>,
    /// HTML form, relative to the configured root
    #[arg(long)]
    form: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut ServiceConfig) {
        config.strict |= self.strict;
        if let Some(tag) = self.image_tag {
            config.image_tag = tag;
        }
        if let Some(template) = self.template {
            config.template = template;
        }
        if let Some(form) = self.form {
            config.form = form;
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn load_config(path: Option<&PathBuf>) -> Result<ServiceConfig, AppError> {
    match path {
        Some(path) => ServiceConfig::load(path),
        None => Ok(ServiceConfig::default()),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Some(Commands::Render { origin, overrides, params }) => {
            overrides.apply(&mut config);
            config.validate()?;
            let manifest = pxetcd::render(&config, &params, &origin)?;
            print!("{}", manifest);
            Ok(())
        }
        Some(Commands::Serve { listen, overrides }) => {
            overrides.apply(&mut config);
            if let Some(listen) = listen {
                config.listen = listen;
            }
            config.validate()?;
            pxetcd::serve(&config).await
        }
        None => {
            config.validate()?;
            pxetcd::serve(&config).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
