//! egui key translation.

use egui::{Event, Modifiers};

use crate::controller::Key;

/// Maps an egui key press to a controller key.
pub fn translate(key: egui::Key, modifiers: Modifiers) -> Option<Key> {
    Some(match key {
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::Enter => Key::Enter,
        egui::Key::Backspace => Key::Backspace,
        egui::Key::Escape => Key::Escape,
        egui::Key::Tab => Key::Tab {
            shift: modifiers.shift,
        },
        _ => return None,
    })
}

/// A press the controller understands, with what is needed to consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub egui_key: egui::Key,
    pub modifiers: Modifiers,
    pub key: Key,
}

/// Collects this frame's relevant key presses in arrival order.
pub fn key_presses(ctx: &egui::Context) -> Vec<KeyPress> {
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => translate(*key, *modifiers).map(|translated| KeyPress {
                    egui_key: *key,
                    modifiers: *modifiers,
                    key: translated,
                }),
                _ => None,
            })
            .collect()
    })
}

/// Removes a handled press so text edits and focus traversal never see it.
pub fn consume(ctx: &egui::Context, press: &KeyPress) {
    ctx.input_mut(|input| input.consume_key(press.modifiers, press.egui_key));
}
