#![warn(missing_docs)]

//! Fixed-timestep 2D platformer core for Macroquad: TMX map loading, a
//! role-tagged tile grid with spatial queries, a character controller, and
//! a scene stack driving it all at 60 simulation ticks per second.

mod error;
mod game;
mod grid;
mod input;
mod loader {
    pub mod tmx;
}
mod map;
mod player;
mod scene;
mod scenes {
    pub mod menu;
    pub mod pause;
    pub mod play;
}
mod tile;
mod tileset;

pub use error::MapError;
pub use game::{run, FixedTimestep, TICK_DT};
pub use grid::{Layer, TileGrid};
pub use input::InputSnapshot;
pub use map::{Map, MapText, TILE_SIZE};
pub use player::{Player, PLAYER_HEIGHT, PLAYER_WIDTH};
pub use scene::{Scene, SceneRequests, SceneStack, Transition};
pub use scenes::menu::MenuScene;
pub use scenes::pause::PauseScene;
pub use scenes::play::PlayScene;
pub use tile::{RawGid, Rotation, TileRole, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use tileset::{Tileset, TilesetRegistry};
