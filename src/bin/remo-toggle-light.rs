// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line runner for a single toggle light accessory.

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand, ValueEnum};
use remo_toggle_light::{AccessoryConfig, HostContext, LightbulbAccessory};
use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "remo-toggle-light";

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Accessory configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the persisted on/off state
    #[arg(long)]
    persist_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the believed on/off state
    Get,
    /// Switch the light on or off
    Set {
        #[arg(value_enum)]
        state: OnOff,
    },
    /// Resolve the configured button to a signal id
    Resolve,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

impl From<OnOff> for bool {
    fn from(value: OnOff) -> Self {
        matches!(value, OnOff::On)
    }
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let mut path = dirs::config_dir().context("could not determine config directory")?;
    path.push(APP_DIR);
    path.push("config.json");
    Ok(path)
}

fn default_persist_dir() -> anyhow::Result<PathBuf> {
    let mut path = dirs::data_dir().context("could not determine data directory")?;
    path.push(APP_DIR);
    Ok(path)
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = AccessoryConfig::from_path(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let persist_dir = match args.persist_dir {
        Some(path) => path,
        None => default_persist_dir()?,
    };
    let host = HostContext::new(persist_dir);

    let light = LightbulbAccessory::from_config(config, &host)
        .await
        .context("failed to set up accessory")?;

    match args.command {
        Command::Get => {
            println!("{}", on_off(light.get_on().await));
        }
        Command::Set { state } => {
            let report = light.set_on(state.into()).await?;
            if report.changed {
                println!(
                    "{} is now {} ({}/{} pulses delivered)",
                    light.name(),
                    on_off(report.desired),
                    report.pulses.delivered(),
                    report.pulses.attempted
                );
            } else {
                println!("{} is already {}", light.name(), on_off(report.desired));
            }
            if !report.is_clean() {
                bail!("{} toggle pulses failed", report.pulses.failed);
            }
        }
        Command::Resolve => match light.reconciler().initialize().await {
            Some(signal_id) => println!("{signal_id}"),
            None => bail!("could not resolve signal id for {}", light.name()),
        },
    }

    Ok(())
}
