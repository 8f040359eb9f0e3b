// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use burnrate::{cli, commands, config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("init", sub)) => {
            let cfg = config::Config {
                base_url: sub.get_one::<String>("url").unwrap().clone(),
                api_key: sub.get_one::<String>("api-key").unwrap().clone(),
                session: None,
            };
            config::save(&cfg)?;
            println!("Config written to {}", config::config_path()?.display());
        }
        Some(("auth", sub)) => commands::auth::handle(sub).await?,
        Some(("tx", sub)) => commands::tx::handle(sub).await?,
        Some(("strategy", sub)) => commands::strategy::handle(sub).await?,
        Some(("dashboard", sub)) => commands::dashboard::handle(sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
