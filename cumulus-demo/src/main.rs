//! Cloud counter application built on the cumulus framework.

mod model;
mod pages;
mod app;

use clap::Parser;
use cumulus::{AppConfig, Application};
use std::path::PathBuf;
use crate::app::Root;

#[derive(Debug, Parser)]
#[command(name = "cumulus-demo", version, about = "Shared cloud counter across routed views")]
struct Cli {
    /// Config file (defaults to <config_dir>/cumulus/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to open at startup, e.g. /detail
    #[arg(long, value_name = "PATH")]
    route: Option<String>,
}

impl Cli {
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(route) = &self.route {
            config.initial_path = route.clone();
            config.validate()?;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    cumulus::logging::init_tracing();

    let cli = Cli::parse();
    let config = cli.app_config()?;
    tracing::info!(?config, "starting");

    Application::new().with_config(config).run(move |cx| {
        cx.set_root(Root::new(cx)?)?;
        Ok(())
    })
}
