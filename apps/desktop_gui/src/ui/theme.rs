use client_core::MessageStyle;
use eframe::egui;

pub struct BubblePalette {
    pub fill: egui::Color32,
    pub label: egui::Color32,
}

pub fn bubble_palette(style: MessageStyle, dark_mode: bool) -> BubblePalette {
    match (style, dark_mode) {
        (MessageStyle::User, true) => BubblePalette {
            fill: egui::Color32::from_rgb(38, 70, 112),
            label: egui::Color32::from_rgb(160, 200, 255),
        },
        (MessageStyle::User, false) => BubblePalette {
            fill: egui::Color32::from_rgb(220, 235, 255),
            label: egui::Color32::from_rgb(20, 70, 150),
        },
        (MessageStyle::Assistant, true) => BubblePalette {
            fill: egui::Color32::from_rgb(48, 50, 56),
            label: egui::Color32::from_rgb(140, 220, 170),
        },
        (MessageStyle::Assistant, false) => BubblePalette {
            fill: egui::Color32::from_rgb(238, 238, 242),
            label: egui::Color32::from_rgb(20, 120, 70),
        },
    }
}

/// User bubbles hug the right edge, assistant bubbles the left.
pub fn bubble_layout(style: MessageStyle) -> egui::Layout {
    match style {
        MessageStyle::User => egui::Layout::right_to_left(egui::Align::TOP),
        MessageStyle::Assistant => egui::Layout::left_to_right(egui::Align::TOP),
    }
}
