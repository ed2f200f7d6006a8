//! Title screen. Entry point of the scene stack.

use log::error;
use macroquad::prelude::*;

use crate::scene::{Scene, SceneRequests};
use crate::scenes::play::PlayScene;

/// Start menu: confirm to play, escape to quit.
pub struct MenuScene;

impl MenuScene {
    /// Fresh menu.
    pub fn new() -> Self {
        MenuScene
    }
}

impl Default for MenuScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for MenuScene {
    fn handle_input(&mut self, requests: &mut SceneRequests) {
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space) {
            match PlayScene::new() {
                Ok(play) => requests.change_scene(Box::new(play)),
                // A broken first level must not kill the process; stay on
                // the menu so the log is readable.
                Err(err) => error!("failed to start game: {err}"),
            }
        }
        if is_key_pressed(KeyCode::Escape) {
            requests.quit();
        }
    }

    fn update(&mut self, _dt: f32, _requests: &mut SceneRequests) {}

    fn render(&self) {
        set_default_camera();
        let cx = screen_width() / 2.0;
        let cy = screen_height() / 2.0;

        let title = "CLOUDHOP";
        let size = measure_text(title, None, 64, 1.0);
        draw_text(title, cx - size.width / 2.0, cy - 40.0, 64.0, WHITE);

        let prompt = "press ENTER to play, ESC to quit";
        let size = measure_text(prompt, None, 24, 1.0);
        draw_text(prompt, cx - size.width / 2.0, cy + 20.0, 24.0, GRAY);
    }
}
