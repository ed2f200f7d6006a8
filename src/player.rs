//! Character controller: steering, wall mechanics, variable gravity, and
//! axis-separated collision resolution against the map's wall tiles.

use macroquad::prelude::*;

use crate::input::InputSnapshot;
use crate::map::Map;

/// Hitbox width in pixels.
pub const PLAYER_WIDTH: f32 = 24.0;
/// Hitbox height in pixels.
pub const PLAYER_HEIGHT: f32 = 32.0;

// Pixel offset of the wall-contact probes.
const WALL_PROBE: f32 = 2.0;
// |vy| below this counts as the jump apex for the gravity regime.
const APEX_THRESHOLD: f32 = 50.0;
// Vertical overlap below this is a floor/ceiling seam, ignored during
// horizontal resolution.
const SEAM_TOLERANCE_Y: f32 = 5.0;
// Horizontal overlap below this is a grazed wall face, ignored during
// vertical resolution.
const SEAM_TOLERANCE_X: f32 = 2.0;
// A landing only counts if the previous bottom edge was above the tile top
// by at most this much; otherwise we were moving in from the side.
const LANDING_TOLERANCE: f32 = 15.0;
// Lateral nudge tried before an upward collision halts the jump.
const CORNER_MARGIN: f32 = 6.0;

/// Simulation state for the one controllable entity. Mutated only by
/// [`Player::update`] and [`Player::reset`].
pub struct Player {
    rect: Rect,
    velocity: Vec2,
    grounded: bool,
    wall_sliding: bool,
    wall_dir: i8,
    facing_right: bool,
    was_jump_pressed: bool,

    // Tuning. Values are feel, not architecture.
    move_speed: f32,
    acceleration: f32,
    friction: f32,
    gravity: f32,
    jump_strength: f32,
    wall_slide_speed: f32,
    wall_jump_force: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Player with the default tuning, parked at an arbitrary position
    /// until [`Player::reset`] places it on a spawn marker.
    pub fn new() -> Self {
        Player {
            rect: Rect::new(100.0, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT),
            velocity: Vec2::ZERO,
            grounded: false,
            wall_sliding: false,
            wall_dir: 0,
            facing_right: true,
            was_jump_pressed: false,
            move_speed: 300.0,
            acceleration: 1500.0,
            friction: 1200.0,
            gravity: 1000.0,
            jump_strength: 500.0,
            wall_slide_speed: 80.0,
            wall_jump_force: vec2(320.0, 480.0),
        }
    }

    /// Centers the hitbox on `position` (a tile center from the map's spawn
    /// marker) and clears all motion state.
    pub fn reset(&mut self, position: Vec2) {
        self.rect.x = position.x - self.rect.w / 2.0;
        self.rect.y = position.y - self.rect.h / 2.0;
        self.velocity = Vec2::ZERO;
        self.grounded = false;
        self.wall_sliding = false;
        self.wall_dir = 0;
        self.was_jump_pressed = false;
    }

    /// Top-left of the hitbox.
    pub fn position(&self) -> Vec2 {
        self.rect.point()
    }

    /// Current hitbox rectangle.
    pub fn bounds(&self) -> Rect {
        self.rect
    }

    /// Current velocity in pixels per second.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the last tick ended standing on a wall tile.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the slide clamp is active this tick.
    pub fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    /// Wall contact direction: -1 left, +1 right, 0 none.
    pub fn wall_dir(&self) -> i8 {
        self.wall_dir
    }

    /// Render-side facing; flips only on meaningful horizontal motion.
    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Advances the simulation by one fixed tick. The step order is part of
    /// the contract: steering, wall detection, jump, gravity regime, then
    /// X resolution before Y resolution.
    pub fn update(&mut self, input: InputSnapshot, dt: f32, map: &Map) {
        self.integrate_horizontal(input, dt);
        self.detect_walls(input, map);
        self.handle_jump(input);
        self.apply_gravity(input, dt);
        self.resolve_x(dt, map);
        self.resolve_y(dt, map);

        if self.velocity.x > 1.0 {
            self.facing_right = true;
        } else if self.velocity.x < -1.0 {
            self.facing_right = false;
        }
    }

    /// Accelerate toward max speed while a direction is held, otherwise
    /// bleed speed off through friction without ever crossing zero.
    fn integrate_horizontal(&mut self, input: InputSnapshot, dt: f32) {
        if input.left && !input.right {
            self.velocity.x -= self.acceleration * dt;
        } else if input.right && !input.left {
            self.velocity.x += self.acceleration * dt;
        } else if self.velocity.x > 0.0 {
            self.velocity.x = (self.velocity.x - self.friction * dt).max(0.0);
        } else if self.velocity.x < 0.0 {
            self.velocity.x = (self.velocity.x + self.friction * dt).min(0.0);
        }

        self.velocity.x = self.velocity.x.clamp(-self.move_speed, self.move_speed);
    }

    /// Probes a couple of pixels past each side of the hitbox for wall
    /// tiles. Sliding engages only while airborne, falling, and steering
    /// into the touched wall; it clamps the fall to the slide speed.
    fn detect_walls(&mut self, input: InputSnapshot, map: &Map) {
        let mut left_probe = self.rect;
        left_probe.x -= WALL_PROBE;
        let mut right_probe = self.rect;
        right_probe.x += WALL_PROBE;

        self.wall_dir = 0;
        self.wall_sliding = false;
        if !map.walls_in(left_probe).is_empty() {
            self.wall_dir = -1;
        }
        if !map.walls_in(right_probe).is_empty() {
            self.wall_dir = 1;
        }

        if self.wall_dir != 0 && self.velocity.y > 0.0 && !self.grounded {
            let steering_into_wall =
                (self.wall_dir == -1 && input.left) || (self.wall_dir == 1 && input.right);
            if steering_into_wall {
                self.wall_sliding = true;
                self.velocity.y = self.wall_slide_speed;
            }
        }
    }

    /// Jump triggers on the rising edge of the input only; holding the
    /// button never re-triggers.
    fn handle_jump(&mut self, input: InputSnapshot) {
        let just_pressed = input.jump && !self.was_jump_pressed;
        if just_pressed {
            if self.grounded {
                self.velocity.y = -self.jump_strength;
                self.grounded = false;
            } else if self.wall_sliding || self.wall_dir != 0 {
                self.velocity.y = -self.wall_jump_force.y;
                self.velocity.x = -f32::from(self.wall_dir) * self.wall_jump_force.x;
            }
        }
        self.was_jump_pressed = input.jump;
    }

    /// Gravity regime selection, checked in this order: apex hang, early
    /// release while rising, fast fall. Wall sliding suppresses gravity
    /// entirely (the slide clamp owns vertical speed).
    fn apply_gravity(&mut self, input: InputSnapshot, dt: f32) {
        let mut gravity = self.gravity;

        if self.velocity.y.abs() < APEX_THRESHOLD && !self.grounded && !self.wall_sliding {
            gravity *= 0.7;
        } else if self.velocity.y < 0.0 && !input.jump {
            gravity *= 2.0;
        } else if self.velocity.y > 0.0 {
            if self.wall_sliding {
                gravity = 0.0;
            } else {
                gravity *= 1.8;
            }
        }

        self.velocity.y += gravity * dt;
    }

    /// Horizontal move and push-out. Tiles whose vertical overlap is below
    /// the seam tolerance are floor/ceiling seams and are skipped so the
    /// hitbox does not snag while running. Push direction comes from which
    /// side of the tile center we are on, not from velocity alone.
    fn resolve_x(&mut self, dt: f32, map: &Map) {
        self.rect.x += self.velocity.x * dt;

        for wall in map.walls_in(self.rect) {
            let overlap_y = (self.rect.y + self.rect.h).min(wall.y + wall.h)
                - self.rect.y.max(wall.y);
            if overlap_y < SEAM_TOLERANCE_Y {
                continue;
            }

            let player_center = self.rect.x + self.rect.w / 2.0;
            let wall_center = wall.x + wall.w / 2.0;

            if self.velocity.x > 0.0 {
                if wall_center > player_center {
                    self.rect.x = wall.x - self.rect.w;
                    self.velocity.x = 0.0;
                }
            } else if self.velocity.x < 0.0 && wall_center < player_center {
                self.rect.x = wall.x + wall.w;
                self.velocity.x = 0.0;
            }
        }
    }

    /// Vertical move and resolution. Grounded is recomputed from scratch
    /// every tick. Tiles with near-zero horizontal overlap are wall faces,
    /// not floors, and are skipped. Landing requires the previous bottom
    /// edge to have been above the tile top; upward hits try a corner
    /// nudge before the jump is halted.
    fn resolve_y(&mut self, dt: f32, map: &Map) {
        self.grounded = false;
        let prev_bottom = self.rect.y + self.rect.h;
        self.rect.y += self.velocity.y * dt;

        for wall in map.walls_in(self.rect) {
            let overlap_x = (self.rect.x + self.rect.w).min(wall.x + wall.w)
                - self.rect.x.max(wall.x);
            if overlap_x < SEAM_TOLERANCE_X {
                continue;
            }

            if self.velocity.y > 0.0 {
                if prev_bottom > wall.y + LANDING_TOLERANCE {
                    continue;
                }
                self.rect.y = wall.y - self.rect.h;
                self.velocity.y = 0.0;
                self.grounded = true;
            } else if self.velocity.y < 0.0 {
                let mut nudge_left = self.rect;
                nudge_left.x -= CORNER_MARGIN;
                if map.walls_in(nudge_left).is_empty() {
                    self.rect.x -= CORNER_MARGIN;
                    continue;
                }
                let mut nudge_right = self.rect;
                nudge_right.x += CORNER_MARGIN;
                if map.walls_in(nudge_right).is_empty() {
                    self.rect.x += CORNER_MARGIN;
                    continue;
                }
                self.rect.y = wall.y + wall.h;
                self.velocity.y = 0.0;
            }
        }
    }

    /// Draws the hitbox as a quad, with a facing stripe. The sprite layer
    /// proper lives outside this crate's scope.
    pub fn draw(&self, show_hitbox: bool) {
        draw_rectangle(self.rect.x, self.rect.y, self.rect.w, self.rect.h, SKYBLUE);
        let stripe_x = if self.facing_right {
            self.rect.x + self.rect.w - 4.0
        } else {
            self.rect.x
        };
        draw_rectangle(stripe_x, self.rect.y + 6.0, 4.0, 6.0, DARKBLUE);
        if show_hitbox {
            draw_rectangle_lines(self.rect.x, self.rect.y, self.rect.w, self.rect.h, 1.0, RED);
        }
    }
}
