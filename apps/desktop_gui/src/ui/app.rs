//! Teller window: three fields, four actions, and a modal result dialog.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::OperationKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{dialog_title, FormState},
};

pub const SETTINGS_STORAGE_KEY: &str = "ledger_teller.form";
const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Field values remembered between runs. Amounts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub recipient: String,
}

impl PersistedForm {
    fn from_form(form: &FormState) -> Self {
        Self {
            username: form.username.trim().to_string(),
            recipient: form.recipient.trim().to_string(),
        }
    }
}

pub struct TellerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: FormState,
    gateway_summary: String,
}

impl TellerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedForm>,
        gateway_summary: String,
    ) -> Self {
        let persisted = persisted.unwrap_or_default();
        let mut form = FormState::with_remembered(persisted.username, persisted.recipient);
        form.status = "Starting ledger worker...".to_string();
        Self {
            cmd_tx,
            ui_rx,
            form,
            gateway_summary,
        }
    }

    fn process_ui_events(&mut self) {
        self.form.drain(&self.ui_rx);
    }

    fn submit(&mut self, kind: OperationKind) {
        match self.form.begin(kind) {
            Ok(command) => {
                if let Err(err) = dispatch_backend_command(&self.cmd_tx, command) {
                    self.form.abort(err);
                }
            }
            Err(rejection) => {
                tracing::debug!(operation = %kind, ?rejection, "ignored form submission");
            }
        }
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if self.form.is_busy() {
                    ui.spinner();
                }
                ui.small(egui::RichText::new(&self.form.status).weak());
            });
            ui.small(egui::RichText::new(&self.gateway_summary).weak());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Blockchain Banking System");
            ui.add_space(8.0);

            egui::Grid::new("teller_fields")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Username:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.username).hint_text("alice"),
                    );
                    ui.end_row();

                    ui.label("Amount:");
                    ui.add(egui::TextEdit::singleline(&mut self.form.amount).hint_text("50"));
                    ui.end_row();

                    ui.label("Recipient:");
                    ui.add(egui::TextEdit::singleline(&mut self.form.recipient).hint_text("bob"));
                    ui.end_row();
                });

            ui.add_space(10.0);

            let enabled = self.form.can_submit();
            let mut clicked = None;
            egui::Grid::new("teller_actions")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (index, kind) in [
                        OperationKind::QueryBalance,
                        OperationKind::Deposit,
                        OperationKind::Withdraw,
                        OperationKind::Transfer,
                    ]
                    .into_iter()
                    .enumerate()
                    {
                        let button = egui::Button::new(button_label(kind))
                            .min_size(egui::vec2(140.0, 28.0));
                        if ui.add_enabled(enabled, button).clicked() {
                            clicked = Some(kind);
                        }
                        if index % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            if let Some(kind) = clicked {
                self.submit(kind);
            }
        });
    }

    fn show_result_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.form.dialog().cloned() else {
            return;
        };

        let mut dismissed = false;
        let response = egui::Modal::new(egui::Id::new("teller_result_dialog")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading(dialog.title);
            ui.add_space(6.0);
            if dialog.is_error {
                let error_color = ui.visuals().error_fg_color;
                ui.colored_label(error_color, &dialog.body);
            } else {
                ui.label(&dialog.body);
            }
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

        if dismissed || response.should_close() {
            self.form.dismiss_dialog();
        }
    }
}

fn button_label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::QueryBalance => "Query Balance",
        OperationKind::Deposit => "Deposit",
        OperationKind::Withdraw => "Withdraw",
        OperationKind::Transfer => "Transfer",
        other => dialog_title(other),
    }
}

impl eframe::App for TellerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_form(ctx);
        self.show_result_dialog(ctx);

        if self.form.is_busy() {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let persisted = PersistedForm::from_form(&self.form);
        if let Ok(serialized) = serde_json::to_string(&persisted) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
