use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use eframe::egui;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

mod backend;
mod config;
mod handlers;
mod state;

use config::Config;
use state::{AppState, StatusKind, StatusLine, VerifyStatus};

struct TokenApp {
    state: Arc<Mutex<AppState>>,
    config: Arc<Config>,
    rt: Arc<Runtime>,
}

impl TokenApp {
    fn new() -> Self {
        let state = Arc::new(Mutex::new(AppState::default()));
        let config = Arc::new(Config::from_env());
        let rt = Arc::new(Runtime::new().unwrap());

        // Populate the saved-value displays on startup.
        rt.spawn(handlers::refresh_saved(
            Arc::clone(&state),
            Arc::clone(&config),
        ));

        Self { state, config, rt }
    }

    fn token_card(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Token Management").strong());
            ui.label("Verify, save, and fetch LinkedIn access token below.");
            ui.small("Please save a valid token before clicking Get Access Token.");
            ui.add_space(4.0);

            let (can_submit, can_fetch) = {
                let mut state = futures::executor::block_on(self.state.lock());
                ui.add(
                    egui::TextEdit::singleline(&mut state.token_input)
                        .hint_text("Enter LinkedIn Token"),
                );
                (state.can_submit_token(), state.can_fetch_access_token())
            };

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(can_submit, egui::Button::new("Verify"))
                    .clicked()
                {
                    self.rt.spawn(handlers::verify(
                        Arc::clone(&self.state),
                        Arc::clone(&self.config),
                    ));
                }
                if ui
                    .add_enabled(can_submit, egui::Button::new("Save"))
                    .clicked()
                {
                    self.rt.spawn(handlers::save(
                        Arc::clone(&self.state),
                        Arc::clone(&self.config),
                    ));
                }
                if ui
                    .add_enabled(can_fetch, egui::Button::new("Get Access Token"))
                    .clicked()
                {
                    self.rt.spawn(handlers::fetch_access_token(
                        Arc::clone(&self.state),
                        Arc::clone(&self.config),
                    ));
                }
            });

            let state = futures::executor::block_on(self.state.lock());
            if let Some(status) = state.verify_status {
                let color = match status {
                    VerifyStatus::Valid => egui::Color32::GREEN,
                    VerifyStatus::Invalid => egui::Color32::RED,
                };
                ui.colored_label(color, status.label());
            }
            if let Some(line) = &state.save_message {
                status_line(ui, line);
            }
            if let Some(line) = &state.access_token_message {
                status_line(ui, line);
            }
        });
    }

    fn post_card(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Post to LinkedIn").strong());
            ui.label("Write and publish a post directly to LinkedIn.");
            ui.small("Please save a valid Auth and Access (sub) token before clicking Post to LinkedIn.");
            ui.add_space(4.0);

            let can_post = {
                let mut state = futures::executor::block_on(self.state.lock());
                ui.add(
                    egui::TextEdit::multiline(&mut state.post_text)
                        .hint_text("Write a post to LinkedIn")
                        .desired_rows(3),
                );
                ui.small(format!("{} characters", state.post_char_count()));
                state.can_post()
            };

            if ui
                .add_enabled(can_post, egui::Button::new("📤 Post to LinkedIn"))
                .clicked()
            {
                self.rt.spawn(handlers::publish_post(
                    Arc::clone(&self.state),
                    Arc::clone(&self.config),
                ));
            }

            let state = futures::executor::block_on(self.state.lock());
            if let Some(line) = &state.post_status {
                status_line(ui, line);
            }
        });
    }

    fn saved_column(&self, ui: &mut egui::Ui) {
        let state = futures::executor::block_on(self.state.lock());

        ui.group(|ui| {
            ui.label(egui::RichText::new("Last Saved Auth Token").strong());
            if state.saved_token.is_empty() {
                ui.label("No token saved yet.");
            } else {
                ui.code(&state.saved_token);
            }
        });

        ui.group(|ui| {
            ui.label(egui::RichText::new("Last Saved Access Token (sub)").strong());
            if state.saved_access_token.is_empty() {
                ui.label("No access token saved yet.");
            } else {
                ui.code(&state.saved_access_token);
            }
        });

        if let Some(refreshed) = state.last_refreshed {
            ui.small(format!("Refreshed at {}", refreshed.format("%H:%M:%S")));
        }
    }
}

fn status_line(ui: &mut egui::Ui, line: &StatusLine) {
    let color = match line.kind {
        StatusKind::Success => egui::Color32::GREEN,
        StatusKind::Failure => egui::Color32::RED,
    };
    ui.colored_label(color, &line.text);
}

impl eframe::App for TokenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Request results land from the runtime's threads; keep polling
        // so they show up without waiting for the next input event.
        ctx.request_repaint_after(Duration::from_millis(200));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🔗 LinkedIn Token Manager");
                if futures::executor::block_on(self.state.lock()).is_loading {
                    ui.spinner();
                }
            });
            ui.label("Manage and post with your LinkedIn access tokens securely.");
            ui.separator();

            ui.columns(2, |columns| {
                self.token_card(&mut columns[0]);
                columns[0].add_space(8.0);
                self.post_card(&mut columns[0]);
                self.saved_column(&mut columns[1]);
            });
        });
    }
}

fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "LinkedIn Token Manager",
        options,
        Box::new(|_cc| Ok(Box::new(TokenApp::new()))),
    )
}
