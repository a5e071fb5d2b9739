//! Ledger worker: owns the gateway and handles commands one at a time off the UI thread.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use ledger_client::{LedgerClient, LedgerGateway};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

pub fn launch<C>(
    gateway: LedgerGateway<C>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()>
where
    C: LedgerClient + 'static,
{
    thread::spawn(move || run_worker(gateway, cmd_rx, ui_tx))
}

fn run_worker<C: LedgerClient>(
    gateway: LedgerGateway<C>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                UiErrorCategory::Unknown,
                UiErrorContext::BackendStartup,
                format!("ledger worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build ledger worker runtime: {err}");
            return;
        }
    };

    tracing::info!(
        org = gateway.org(),
        channel = %gateway.target().channel,
        chaincode = %gateway.target().chaincode,
        "ledger worker ready"
    );
    let _ = ui_tx.try_send(UiEvent::BackendReady);

    runtime.block_on(async move {
        // Commands are awaited to completion before the next is read, so
        // ledger calls never overlap.
        while let Ok(cmd) = cmd_rx.recv() {
            let cmd_name = cmd.name();
            tracing::debug!(command = cmd_name, "ledger worker: handling command");
            let event = execute_command(&gateway, cmd).await;
            if ui_tx.send(event).is_err() {
                tracing::warn!(command = cmd_name, "ui event channel closed; stopping ledger worker");
                break;
            }
        }
    });
    tracing::info!("ledger worker stopped");
}

pub async fn execute_command<C: LedgerClient>(
    gateway: &LedgerGateway<C>,
    cmd: BackendCommand,
) -> UiEvent {
    let kind = cmd.kind();
    let result = match &cmd {
        BackendCommand::QueryBalance { username } => gateway.query_balance(username).await,
        BackendCommand::Deposit { username, amount } => gateway.deposit(username, amount).await,
        BackendCommand::Withdraw { username, amount } => {
            gateway.withdraw(username, amount).await
        }
        BackendCommand::Transfer { from, to, amount } => {
            gateway.transfer(from, to, amount).await
        }
    };

    UiEvent::OperationFinished {
        kind,
        outcome: result.map_err(|err| UiError::from_ledger(&err)),
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
