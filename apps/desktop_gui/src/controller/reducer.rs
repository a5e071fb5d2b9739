//! Form state machine: idle, awaiting a ledger response, showing the result.

use crossbeam_channel::{Receiver, TryRecvError};
use shared::domain::{LedgerPayload, OperationKind};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorCategory, UiErrorContext, UiEvent};

const WORKER_STOPPED_MESSAGE: &str = "Ledger worker stopped unexpectedly; restart the app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDialog {
    pub title: &'static str,
    pub body: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Another action is still waiting for the ledger.
    Busy(OperationKind),
    /// The previous result has not been dismissed yet.
    DialogOpen,
    /// The form has no button for this operation.
    NotOnForm(OperationKind),
    /// The ledger worker is gone; the click was answered with an error dialog.
    WorkerStopped,
}

#[derive(Debug, Default)]
pub struct FormState {
    pub username: String,
    pub amount: String,
    pub recipient: String,
    pub status: String,
    pending: Option<BackendCommand>,
    dialog: Option<ResultDialog>,
    worker_stopped: bool,
}

impl FormState {
    pub fn with_remembered(username: String, recipient: String) -> Self {
        Self {
            username,
            recipient,
            ..Self::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dialog(&self) -> Option<&ResultDialog> {
        self.dialog.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && self.dialog.is_none()
    }

    /// Reads the fields into a command and marks it pending. At most one
    /// command is in flight at a time.
    pub fn begin(&mut self, kind: OperationKind) -> Result<BackendCommand, SubmitRejection> {
        if let Some(pending) = &self.pending {
            return Err(SubmitRejection::Busy(pending.kind()));
        }
        if self.dialog.is_some() {
            return Err(SubmitRejection::DialogOpen);
        }
        let command =
            BackendCommand::from_form(kind, &self.username, &self.amount, &self.recipient)
                .ok_or(SubmitRejection::NotOnForm(kind))?;
        if self.worker_stopped {
            self.finish(&command, Err(worker_stopped_error()));
            return Err(SubmitRejection::WorkerStopped);
        }

        self.status = format!("{}: waiting for the ledger...", dialog_title(kind));
        self.pending = Some(command.clone());
        Ok(command)
    }

    /// The command never reached the worker.
    pub fn abort(&mut self, error: UiError) {
        if let Some(command) = self.pending.take() {
            self.finish(&command, Err(error));
        }
    }

    /// Applies every queued worker event. A closed channel means the worker
    /// thread has exited, so whatever is pending can never finish.
    pub fn drain(&mut self, ui_rx: &Receiver<UiEvent>) {
        loop {
            match ui_rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.mark_worker_stopped();
                    break;
                }
            }
        }
    }

    fn mark_worker_stopped(&mut self) {
        if self.worker_stopped {
            return;
        }
        self.worker_stopped = true;
        tracing::error!("ledger worker channel closed");
        match self.pending.take() {
            Some(command) => self.finish(&command, Err(worker_stopped_error())),
            None => self.status = WORKER_STOPPED_MESSAGE.to_string(),
        }
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::BackendReady => {
                self.status = "Ledger worker ready".to_string();
            }
            UiEvent::Error(error) => {
                tracing::error!(
                    context = ?error.context(),
                    category = ?error.category(),
                    "{}",
                    error.message()
                );
                match self.pending.take() {
                    Some(command) => self.finish(&command, Err(error)),
                    None => {
                        self.status =
                            format!("{}: {}", err_label(error.category()), error.message());
                    }
                }
            }
            UiEvent::OperationFinished { kind, outcome } => {
                let Some(command) = self.pending.take() else {
                    tracing::warn!(operation = %kind, "ledger result arrived with nothing pending");
                    return;
                };
                if command.kind() != kind {
                    tracing::warn!(
                        expected = %command.kind(),
                        received = %kind,
                        "ledger result does not match the pending action"
                    );
                }
                self.finish(&command, outcome);
            }
        }
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    fn finish(&mut self, command: &BackendCommand, outcome: Result<LedgerPayload, UiError>) {
        let dialog = dialog_for(command, &outcome);
        self.status = if dialog.is_error {
            format!("{} failed", dialog.title)
        } else {
            format!("{} done", dialog.title)
        };
        self.dialog = Some(dialog);
    }
}

fn worker_stopped_error() -> UiError {
    UiError::new(
        UiErrorCategory::Connectivity,
        UiErrorContext::Dispatch,
        WORKER_STOPPED_MESSAGE,
    )
}

pub fn dialog_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::QueryBalance => "Query Balance",
        OperationKind::Deposit => "Deposit Funds",
        OperationKind::Withdraw => "Withdraw Funds",
        OperationKind::Transfer => "Transfer Funds",
        OperationKind::CreateAccount => "Create Account",
        OperationKind::GetAccount => "Get Account",
        OperationKind::GetTransfer | OperationKind::GetTransferByStateKey => "Get Transfer",
        OperationKind::ListAccounts => "All Accounts",
        OperationKind::ListTransfers => "All Transfers",
        OperationKind::ListTransactions => "All Transactions",
    }
}

pub fn dialog_for(
    command: &BackendCommand,
    outcome: &Result<LedgerPayload, UiError>,
) -> ResultDialog {
    let title = dialog_title(command.kind());
    let username = command.username().trim();
    match outcome {
        Ok(payload) => {
            let body = match command {
                BackendCommand::QueryBalance { .. } => {
                    format!("Balance for {username}: {payload}")
                }
                BackendCommand::Deposit { .. } => format!("Deposit result: {payload}"),
                BackendCommand::Withdraw { .. } => format!("Withdrawal result: {payload}"),
                BackendCommand::Transfer { .. } => format!("Transfer result: {payload}"),
            };
            ResultDialog {
                title,
                body,
                is_error: false,
            }
        }
        Err(error) => {
            let what = match command {
                BackendCommand::QueryBalance { .. } => {
                    format!("Balance query for {username}")
                }
                BackendCommand::Deposit { .. } => "Deposit".to_string(),
                BackendCommand::Withdraw { .. } => "Withdrawal".to_string(),
                BackendCommand::Transfer { .. } => "Transfer".to_string(),
            };
            ResultDialog {
                title,
                body: format!(
                    "{what} failed ({}): {}",
                    err_label(error.category()),
                    error.message()
                ),
                is_error: true,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
