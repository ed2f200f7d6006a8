//! The loaded map: tile grid + tileset registry + level markers, plus the
//! spatial queries the character controller runs every tick.

use std::path::Path;

use macroquad::prelude::*;

use crate::error::MapError;
use crate::grid::TileGrid;
use crate::loader::tmx;
use crate::tile::{RawGid, Rotation, TileRole};
use crate::tileset::TilesetRegistry;

/// Tile edge length in pixels. The whole coordinate system is derived from
/// this.
pub const TILE_SIZE: f32 = 32.0;

// Hazard hitboxes are inset so grazing a tile seam is not a death.
const SPIKE_INSET_X: f32 = 4.0;
const SPIKE_INSET_TOP: f32 = 10.0;

/// A labeled text region from the map's annotation object group.
#[derive(Debug, Clone, PartialEq)]
pub struct MapText {
    /// Object name from the map source.
    pub name: String,
    /// World position of the text anchor.
    pub position: Vec2,
    /// Authored box size; rendering may ignore it.
    pub size: Vec2,
    /// The text itself.
    pub content: String,
}

/// One fully loaded level. Loading a new map replaces the whole value; a
/// failed load leaves the previous one untouched in the caller's hands.
pub struct Map {
    pub(crate) grid: TileGrid,
    pub(crate) tilesets: TilesetRegistry,
    pub(crate) start_position: Vec2,
    pub(crate) finish_areas: Vec<Rect>,
    pub(crate) texts: Vec<MapText>,
}

impl Map {
    /// Parses a map from TMX source text. Pure and synchronous; no textures
    /// are loaded, which keeps this usable headless.
    pub fn load_from_str(text: &str) -> Result<Map, MapError> {
        tmx::load_map_str(text)
    }

    /// Reads and parses a `.tmx` file, then loads the tileset textures.
    /// Loading is blocking by design: it only happens at level-transition
    /// boundaries, never mid-tick.
    pub fn load(path: &str) -> Result<Map, MapError> {
        if Path::new(path).extension().and_then(|e| e.to_str()) != Some("tmx") {
            return Err(MapError::UnsupportedFormat(path.to_owned()));
        }
        let text = std::fs::read_to_string(path)?;
        let mut map = Map::load_from_str(&text)?;
        map.tilesets.load_textures();
        Ok(map)
    }

    /// Player spawn position (center of the first Start tile).
    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    /// Goal trigger strips, one per Finish tile.
    pub fn finish_areas(&self) -> &[Rect] {
        &self.finish_areas
    }

    /// Annotation texts for the render layer.
    pub fn texts(&self) -> &[MapText] {
        &self.texts
    }

    /// Map width in pixels.
    pub fn width_px(&self) -> f32 {
        self.grid.width() as f32 * TILE_SIZE
    }

    /// Map height in pixels.
    pub fn height_px(&self) -> f32 {
        self.grid.height() as f32 * TILE_SIZE
    }

    /// Grid accessor for the render layer.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Registry accessor for the render layer.
    pub fn tilesets(&self) -> &TilesetRegistry {
        &self.tilesets
    }

    /// Inclusive tile-index window covered by a world-space rectangle,
    /// clamped to the grid. `None` when the grid is empty.
    fn tile_window(&self, bounds: Rect) -> Option<(usize, usize, usize, usize)> {
        if self.grid.is_empty() || self.grid.width() == 0 || self.grid.height() == 0 {
            return None;
        }
        let left = ((bounds.x / TILE_SIZE) as i64).max(0) as usize;
        let top = ((bounds.y / TILE_SIZE) as i64).max(0) as usize;
        let right = (((bounds.x + bounds.w) / TILE_SIZE) as i64).max(0) as usize;
        let bottom = (((bounds.y + bounds.h) / TILE_SIZE) as i64).max(0) as usize;
        Some((
            left.min(self.grid.width() - 1),
            top.min(self.grid.height() - 1),
            right.min(self.grid.width() - 1),
            bottom.min(self.grid.height() - 1),
        ))
    }

    /// Collects the rectangles of all tiles with the given role inside the
    /// tile window covered by `bounds`, scanning every layer.
    ///
    /// This is a bounded scan rather than a spatial index: the grid itself
    /// is a perfect spatial hash and query windows span at most a few
    /// tiles. Spike tiles report their inset hitbox.
    pub fn tiles_with_role(&self, bounds: Rect, role: TileRole) -> Vec<Rect> {
        let mut out = Vec::new();
        let Some((left, top, right, bottom)) = self.tile_window(bounds) else {
            return out;
        };

        for layer_idx in 0..self.grid.layers().len() {
            for row in top..=bottom {
                for col in left..=right {
                    let raw = self.grid.cell(layer_idx, col, row);
                    if raw.is_empty() {
                        continue;
                    }
                    if self.tilesets.role_of(raw.clean()) != Some(role) {
                        continue;
                    }
                    let mut rect = Rect::new(
                        col as f32 * TILE_SIZE,
                        row as f32 * TILE_SIZE,
                        TILE_SIZE,
                        TILE_SIZE,
                    );
                    if role == TileRole::Spikes {
                        rect.x += SPIKE_INSET_X;
                        rect.w -= SPIKE_INSET_X * 2.0;
                        rect.y += SPIKE_INSET_TOP;
                        rect.h -= SPIKE_INSET_TOP;
                    }
                    out.push(rect);
                }
            }
        }
        out
    }

    /// Solid wall tiles in the window of `bounds`.
    pub fn walls_in(&self, bounds: Rect) -> Vec<Rect> {
        self.tiles_with_role(bounds, TileRole::Wall)
    }

    /// One-way platform tiles in the window of `bounds`. Resolution policy
    /// (landing only) is the caller's.
    pub fn platforms_in(&self, bounds: Rect) -> Vec<Rect> {
        self.tiles_with_role(bounds, TileRole::Platform)
    }

    /// Whether `bounds` overlaps any spike hitbox.
    pub fn touches_spikes(&self, bounds: Rect) -> bool {
        self.tiles_with_role(bounds, TileRole::Spikes)
            .iter()
            .any(|spike| bounds.overlaps(spike))
    }

    /// Whether `bounds` overlaps any finish trigger strip.
    pub fn reaches_finish(&self, bounds: Rect) -> bool {
        self.finish_areas.iter().any(|area| bounds.overlaps(area))
    }

    /// Draws all layers inside the view rectangle, back to front, with a
    /// one-tile culling margin. Logic-atlas tiles are hidden unless hitbox
    /// display is on; atlases without a loaded texture are skipped.
    pub fn draw(&self, view: Rect, show_hitboxes: bool) {
        let Some((left, top, right, bottom)) = self.tile_window(Rect::new(
            view.x - TILE_SIZE,
            view.y - TILE_SIZE,
            view.w + TILE_SIZE * 2.0,
            view.h + TILE_SIZE * 2.0,
        )) else {
            return;
        };

        for layer_idx in 0..self.grid.layers().len() {
            for row in top..=bottom {
                for col in left..=right {
                    let raw = self.grid.cell(layer_idx, col, row);
                    if raw.is_empty() {
                        continue;
                    }
                    self.draw_tile(raw, col, row, show_hitboxes);
                }
            }
        }
    }

    fn draw_tile(&self, raw: RawGid, col: usize, row: usize, show_hitboxes: bool) {
        let Some(ts) = self.tilesets.resolve(raw.clean()) else {
            return;
        };
        if ts.is_logic() && !show_hitboxes {
            return;
        }
        let Some(texture) = &ts.texture else {
            return;
        };
        if ts.columns == 0 {
            return;
        }

        let local = ts.local_id(raw.clean());
        let src_col = local % ts.columns;
        let src_row = local / ts.columns;

        let rotation = if raw.flip_d() {
            raw.rotation().radians()
        } else if raw.flip_h() && raw.flip_v() {
            Rotation::Deg180.radians()
        } else {
            0.0
        };
        // Once a rotation is in play the mirror axes are consumed by the
        // decode; only the rotation-free cases keep their flips.
        let (flip_x, flip_y) = if raw.flip_d() || (raw.flip_h() && raw.flip_v()) {
            (false, false)
        } else {
            (raw.flip_h(), raw.flip_v())
        };

        draw_texture_ex(
            texture,
            col as f32 * TILE_SIZE,
            row as f32 * TILE_SIZE,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(TILE_SIZE, TILE_SIZE)),
                source: Some(Rect::new(
                    (src_col * ts.tile_width) as f32,
                    (src_row * ts.tile_height) as f32,
                    ts.tile_width as f32,
                    ts.tile_height as f32,
                )),
                rotation,
                flip_x,
                flip_y,
                ..Default::default()
            },
        );
    }
}
