//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use tower_defense_rendering::GameOverPresentation;

/// Snapshot of the game over prompt's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RestartPromptContext {
    /// Top-left corner of the prompt in screen coordinates.
    pub(crate) origin: Vec2,
    /// Prompt dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Final results of the match.
    pub(crate) results: GameOverPresentation,
}

/// Renders the game over prompt and reports whether "Play again" was pressed.
pub(crate) fn draw_restart_prompt(ui: &mut Ui, context: RestartPromptContext) -> bool {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .font_size(22)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .font_size(22)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let results = context.results;
    let mut pressed = false;
    let _ = ui.window(hash!("restart_prompt"), context.origin, context.size, |ui| {
        ui.label(None, "Game Over");
        ui.label(None, &format!("Score: {}", results.score));
        match results.high_score {
            Some(best) if results.new_high_score => {
                ui.label(None, &format!("New high score: {best}"));
            }
            Some(best) => ui.label(None, &format!("Best: {best}")),
            None => {}
        }
        ui.label(None, "Press R or the button below.");

        pressed = ui.button(None, "Play again");
    });

    ui.pop_skin();

    pressed
}
