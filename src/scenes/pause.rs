//! Pause overlay. Pushed on top of the play scene, which stays rendered
//! (the stack draws bottom-to-top) but stops updating (top-only dispatch).

use macroquad::prelude::*;

use crate::scene::{Scene, SceneRequests};

/// Translucent pause screen; escape or enter resumes.
pub struct PauseScene;

impl PauseScene {
    /// Fresh overlay.
    pub fn new() -> Self {
        PauseScene
    }
}

impl Default for PauseScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PauseScene {
    fn handle_input(&mut self, requests: &mut SceneRequests) {
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Enter) {
            requests.pop_scene();
        }
    }

    fn update(&mut self, _dt: f32, _requests: &mut SceneRequests) {}

    fn render(&self) {
        // The play scene beneath left a world camera active.
        set_default_camera();
        draw_rectangle(
            0.0,
            0.0,
            screen_width(),
            screen_height(),
            Color::new(0.0, 0.0, 0.0, 0.6),
        );

        let label = "PAUSED";
        let size = measure_text(label, None, 48, 1.0);
        draw_text(
            label,
            screen_width() / 2.0 - size.width / 2.0,
            screen_height() / 2.0,
            48.0,
            WHITE,
        );
    }
}
