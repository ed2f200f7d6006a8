//! Gameplay scene: owns the current map, the player, and level progression.

use log::warn;
use macroquad::prelude::*;

use crate::error::MapError;
use crate::input::InputSnapshot;
use crate::map::Map;
use crate::player::Player;
use crate::scene::{Scene, SceneRequests};
use crate::scenes::menu::MenuScene;
use crate::scenes::pause::PauseScene;

// Logical view size; the camera shows this much world, clamped to the map.
const VIEW_WIDTH: f32 = 960.0;
const VIEW_HEIGHT: f32 = 540.0;

// Falling this far below the bottom edge respawns the player.
const FALL_MARGIN: f32 = 200.0;

// Annotation texts fade in as the player approaches.
const TEXT_FADE_NEAR: f32 = 75.0;
const TEXT_FADE_FAR: f32 = 150.0;

const LEVELS: &[&str] = &[
    "assets/maps/level1.tmx",
    "assets/maps/level2.tmx",
    "assets/maps/level3.tmx",
];

/// The running game. Constructing it loads the first level; a failed load
/// is the caller's problem (the menu stays up and logs it).
pub struct PlayScene {
    map: Map,
    player: Player,
    current_level: usize,
    show_hitboxes: bool,
}

impl PlayScene {
    /// Loads the first level and places the player on its spawn marker.
    pub fn new() -> Result<Self, MapError> {
        let map = Map::load(LEVELS[0])?;
        let mut player = Player::new();
        player.reset(map.start_position());
        Ok(PlayScene {
            map,
            player,
            current_level: 0,
            show_hitboxes: false,
        })
    }

    fn respawn(&mut self) {
        self.player.reset(self.map.start_position());
    }

    /// Swaps in the next level, or returns to the menu after the last one.
    /// A failed load keeps the current level playable.
    fn advance_level(&mut self, requests: &mut SceneRequests) {
        let next = self.current_level + 1;
        if next >= LEVELS.len() {
            requests.change_scene(Box::new(MenuScene::new()));
            return;
        }
        match Map::load(LEVELS[next]) {
            Ok(map) => {
                self.map = map;
                self.current_level = next;
                self.respawn();
            }
            Err(err) => {
                warn!("failed to load {}: {err}", LEVELS[next]);
                self.respawn();
            }
        }
    }

    /// World rectangle the camera shows: centered on the player, clamped to
    /// the map edges, never larger than the map.
    fn view(&self) -> Rect {
        let w = VIEW_WIDTH.min(self.map.width_px());
        let h = VIEW_HEIGHT.min(self.map.height_px());
        let center = self.player.bounds().center();
        let x = (center.x - w / 2.0).clamp(0.0, (self.map.width_px() - w).max(0.0));
        let y = (center.y - h / 2.0).clamp(0.0, (self.map.height_px() - h).max(0.0));
        Rect::new(x, y, w, h)
    }

    fn draw_texts(&self) {
        let player_center = self.player.bounds().center();
        for text in self.map.texts() {
            let distance = player_center.distance(text.position);
            let alpha = if distance <= TEXT_FADE_NEAR {
                1.0
            } else if distance >= TEXT_FADE_FAR {
                0.0
            } else {
                1.0 - (distance - TEXT_FADE_NEAR) / (TEXT_FADE_FAR - TEXT_FADE_NEAR)
            };
            if alpha <= 0.0 {
                continue;
            }
            draw_text(
                &text.content,
                text.position.x,
                text.position.y,
                20.0,
                Color::new(1.0, 1.0, 1.0, alpha),
            );
        }
    }
}

impl Scene for PlayScene {
    fn handle_input(&mut self, requests: &mut SceneRequests) {
        if is_key_pressed(KeyCode::Escape) {
            requests.push_scene(Box::new(PauseScene::new()));
        }
        if is_key_pressed(KeyCode::F1) {
            self.show_hitboxes = !self.show_hitboxes;
        }
        if is_key_pressed(KeyCode::R) {
            self.respawn();
        }
    }

    fn update(&mut self, dt: f32, requests: &mut SceneRequests) {
        let input = InputSnapshot::poll();
        self.player.update(input, dt, &self.map);

        let bounds = self.player.bounds();
        if bounds.y > self.map.height_px() + FALL_MARGIN {
            self.respawn();
        } else if self.map.touches_spikes(bounds) {
            self.respawn();
        } else if self.map.reaches_finish(bounds) {
            self.advance_level(requests);
        }
    }

    fn render(&self) {
        let view = self.view();
        // from_display_rect wants a y-up rect; flip the height to keep the
        // world y-down.
        let camera =
            Camera2D::from_display_rect(Rect::new(view.x, view.y + view.h, view.w, -view.h));
        set_camera(&camera);

        self.map.draw(view, self.show_hitboxes);
        self.player.draw(self.show_hitboxes);
        self.draw_texts();

        set_default_camera();
        draw_text(
            &format!("level {}/{}", self.current_level + 1, LEVELS.len()),
            12.0,
            24.0,
            20.0,
            WHITE,
        );
    }
}
