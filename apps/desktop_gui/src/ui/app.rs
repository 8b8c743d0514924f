use std::time::Duration;

use client_core::{ChatController, RenderedMessage, UiEvent, ViewModel};
use crossbeam_channel::Receiver;
use eframe::egui;

use crate::ui::theme::{bubble_layout, bubble_palette};

const IDLE_REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_HINT: &str = "Type your message...";

pub struct ChatApp {
    controller: ChatController,
    view: ViewModel,
    ui_rx: Receiver<UiEvent>,
    focus_input: bool,
}

impl ChatApp {
    pub fn new(controller: ChatController, view: ViewModel, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            controller,
            view,
            ui_rx,
            focus_input: true,
        }
    }

    /// Applies every event the worker has queued since the last frame.
    /// Returns how many were handled.
    pub fn process_ui_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_event(event, &mut self.view);
            handled += 1;
        }
        handled
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    fn submit(&mut self) {
        if self.controller.submit_query(&mut self.view) {
            self.focus_input = true;
        }
    }

    fn show_composer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("composer")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let mic = ui
                        .add_enabled(self.view.mic_enabled(), egui::Button::new("Mic"))
                        .on_hover_text("Speak your request");
                    if mic.clicked() {
                        self.controller.request_voice_input(&mut self.view);
                    }

                    let send = ui.button("Send");

                    let edit = egui::TextEdit::singleline(&mut self.view.input)
                        .id_salt("chat_input")
                        .hint_text(
                            egui::RichText::new(INPUT_HINT)
                                .color(ui.visuals().weak_text_color()),
                        )
                        .desired_width(f32::INFINITY);
                    let edit_resp = ui.add_sized([ui.available_width(), 30.0], edit);

                    if self.focus_input {
                        edit_resp.request_focus();
                        self.focus_input = false;
                    }

                    let enter_pressed =
                        edit_resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter_pressed || send.clicked() {
                        self.submit();
                    }
                });
                ui.add_space(4.0);
                ui.small(egui::RichText::new(self.view.status_line()).weak());
                ui.add_space(4.0);
            });
    }

    fn show_transcript(&mut self, ctx: &egui::Context) {
        let scroll_requested = self.view.take_scroll_request();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in self.view.messages() {
                        show_message(ui, message);
                        ui.add_space(6.0);
                    }
                    if scroll_requested {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });
    }
}

fn show_message(ui: &mut egui::Ui, message: &RenderedMessage) {
    let palette = bubble_palette(message.style, ui.visuals().dark_mode);
    let max_width = ui.available_width() * 0.8;
    ui.with_layout(bubble_layout(message.style), |ui| {
        egui::Frame::new()
            .fill(palette.fill)
            .inner_margin(egui::Margin::same(8))
            .corner_radius(egui::CornerRadius::same(6))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{}:", message.label))
                            .strong()
                            .color(palette.label),
                    );
                    ui.label(&message.content);
                });
            });
    });
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_composer(ctx);
        self.show_transcript(ctx);

        // Poll results arrive without user input.
        ctx.request_repaint_after(IDLE_REPAINT_INTERVAL);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
