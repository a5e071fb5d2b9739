use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use ledger_client::{load_profile, HttpLedgerClient, LedgerGateway, NetworkProfile, ProfileOverrides};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{PersistedForm, TellerApp, SETTINGS_STORAGE_KEY};

const COMMAND_QUEUE_DEPTH: usize = 16;
const EVENT_QUEUE_DEPTH: usize = 64;

#[derive(Parser, Debug)]
#[command(author, version, about = "Desktop teller for the banking chaincode")]
struct Args {
    /// Network profile (TOML). Defaults to ./teller.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    gateway_url: Option<String>,
    #[arg(long)]
    org: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long, value_delimiter = ',')]
    peers: Option<Vec<String>>,
    #[arg(long)]
    chaincode: Option<String>,
}

impl Args {
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            gateway_url: self.gateway_url.clone(),
            org: self.org.clone(),
            channel: self.channel.clone(),
            peers: self.peers.clone(),
            chaincode: self.chaincode.clone(),
        }
    }
}

fn gateway_summary(profile: &NetworkProfile) -> String {
    format!(
        "{} | {} | channel {} | chaincode {}",
        profile.gateway_url, profile.org, profile.channel, profile.chaincode
    )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let profile = load_profile(args.config.as_deref(), &args.overrides())
        .context("failed to load network profile")?;
    let client = HttpLedgerClient::from_profile(&profile)?;
    let gateway = LedgerGateway::from_profile(client, &profile);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(COMMAND_QUEUE_DEPTH);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(EVENT_QUEUE_DEPTH);
    backend_bridge::runtime::launch(gateway, cmd_rx, ui_tx);

    let summary = gateway_summary(&profile);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Blockchain Banking System")
            .with_inner_size([440.0, 300.0])
            .with_min_inner_size([380.0, 260.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Ledger Teller",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedForm>(&text).ok())
            });
            Ok(Box::new(TellerApp::new(cmd_tx, ui_rx, persisted, summary)))
        }),
    )
    .map_err(|err| anyhow!("teller window failed: {err}"))
}
