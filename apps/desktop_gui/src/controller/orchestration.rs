//! Command orchestration from UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "queueing ui->backend command");

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(UiError::new(
                UiErrorCategory::Connectivity,
                UiErrorContext::Dispatch,
                "UI command queue is full; please retry",
            ))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            Err(UiError::new(
                UiErrorCategory::Connectivity,
                UiErrorContext::Dispatch,
                "Ledger worker disconnected (possible startup/runtime failure); restart the app",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn deposit() -> BackendCommand {
        BackendCommand::Deposit {
            username: "alice".into(),
            amount: "50".into(),
        }
    }

    #[test]
    fn queues_command_for_worker() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, deposit()).expect("queued");
        assert_eq!(rx.try_recv().expect("command"), deposit());
    }

    #[test]
    fn full_queue_is_reported() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, deposit()).expect("first fits");
        let err = dispatch_backend_command(&tx, deposit()).expect_err("queue full");
        assert!(err.message().contains("full"));
        assert_eq!(err.category(), UiErrorCategory::Connectivity);
    }

    #[test]
    fn dead_worker_is_a_connectivity_error() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        drop(rx);
        let err = dispatch_backend_command(&tx, deposit()).expect_err("disconnected");
        assert_eq!(err.category(), UiErrorCategory::Connectivity);
        assert_eq!(err.context(), UiErrorContext::Dispatch);
    }
}
