//! Tileset registry: global tile id -> owning atlas -> role.

use log::warn;
use macroquad::prelude::{FilterMode, Texture2D};

use crate::tile::TileRole;

/// Tileset names that mark the logic atlas. Tiles resolving into any other
/// atlas are decoration and carry no role.
const LOGIC_TILESET_NAMES: [&str; 2] = ["ts_main", "MainTileset"];

/// One tile atlas: an image laid out as a regular grid, claiming the global
/// id range starting at `first_gid`.
pub struct Tileset {
    /// First global tile id this atlas claims.
    pub first_gid: u32,
    /// Atlas name from the map source.
    pub name: String,
    /// Tile width in the atlas image, pixels.
    pub tile_width: u32,
    /// Tile height in the atlas image, pixels.
    pub tile_height: u32,
    /// Number of tiles in the atlas.
    pub tile_count: u32,
    /// Tiles per atlas row; 0 for an unreadable placeholder.
    pub columns: u32,
    /// Resolved image path; empty when the atlas description could not be
    /// read (the descriptor is still registered so gid ranges stay stable).
    pub image: String,
    /// Filled by [`TilesetRegistry::load_textures`]; `None` in headless use.
    pub texture: Option<Texture2D>,
}

impl Tileset {
    /// Whether this atlas encodes tile roles by column position.
    pub fn is_logic(&self) -> bool {
        LOGIC_TILESET_NAMES.contains(&self.name.as_str())
    }

    /// Atlas-local id of a masked global id belonging to this tileset.
    #[inline]
    pub fn local_id(&self, gid: u32) -> u32 {
        gid - self.first_gid
    }
}

/// Ordered set of atlases, resolved by first-global-id coverage.
#[derive(Default)]
pub struct TilesetRegistry {
    tilesets: Vec<Tileset>,
}

impl TilesetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an atlas. Declaration order does not matter for lookup.
    pub fn push(&mut self, tileset: Tileset) {
        self.tilesets.push(tileset);
    }

    /// All registered atlases, in declaration order.
    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    /// Finds the atlas with the greatest `first_gid <= gid`.
    ///
    /// Declarations are usually sorted by first_gid, but this is a full scan
    /// on purpose: unsorted declarations must still resolve. A gid below
    /// every first_gid has no atlas and the tile is treated as nonexistent.
    pub fn resolve(&self, gid: u32) -> Option<&Tileset> {
        let mut best: Option<&Tileset> = None;
        for ts in &self.tilesets {
            if gid >= ts.first_gid && best.map_or(true, |b| ts.first_gid > b.first_gid) {
                best = Some(ts);
            }
        }
        best
    }

    /// Role of a masked global id, or `None` when the id does not resolve
    /// into the logic atlas.
    pub fn role_of(&self, gid: u32) -> Option<TileRole> {
        let ts = self.resolve(gid)?;
        if !ts.is_logic() || ts.columns == 0 {
            return None;
        }
        TileRole::from_column(ts.local_id(gid) % ts.columns)
    }

    /// Loads atlas images into GPU textures. A missing or unreadable image
    /// only disables rendering for that atlas; queries keep working.
    pub fn load_textures(&mut self) {
        for ts in &mut self.tilesets {
            if ts.image.is_empty() || ts.texture.is_some() {
                continue;
            }
            match std::fs::read(&ts.image) {
                Ok(bytes) => {
                    let tex = Texture2D::from_file_with_format(&bytes, None);
                    tex.set_filter(FilterMode::Nearest);
                    ts.texture = Some(tex);
                }
                Err(err) => warn!("failed to load tileset image {}: {err}", ts.image),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(name: &str, first_gid: u32, columns: u32) -> Tileset {
        Tileset {
            first_gid,
            name: name.to_owned(),
            tile_width: 32,
            tile_height: 32,
            tile_count: columns * 5,
            columns,
            image: String::new(),
            texture: None,
        }
    }

    #[test]
    fn resolves_greatest_first_gid_at_or_below() {
        let mut reg = TilesetRegistry::new();
        reg.push(tileset("ts_main", 1, 5));
        reg.push(tileset("ts_deco", 26, 8));
        assert_eq!(reg.resolve(1).unwrap().name, "ts_main");
        assert_eq!(reg.resolve(25).unwrap().name, "ts_main");
        assert_eq!(reg.resolve(26).unwrap().name, "ts_deco");
        assert_eq!(reg.resolve(900).unwrap().name, "ts_deco");
    }

    #[test]
    fn tolerates_unsorted_declarations() {
        let mut reg = TilesetRegistry::new();
        reg.push(tileset("ts_deco", 26, 8));
        reg.push(tileset("ts_main", 1, 5));
        assert_eq!(reg.resolve(10).unwrap().name, "ts_main");
        assert_eq!(reg.resolve(30).unwrap().name, "ts_deco");
    }

    #[test]
    fn gid_below_every_first_gid_misses() {
        let mut reg = TilesetRegistry::new();
        reg.push(tileset("ts_main", 10, 5));
        assert!(reg.resolve(9).is_none());
        assert!(reg.role_of(9).is_none());
    }

    #[test]
    fn role_comes_from_logic_atlas_column() {
        let mut reg = TilesetRegistry::new();
        reg.push(tileset("ts_main", 1, 5));
        reg.push(tileset("ts_deco", 26, 5));
        assert_eq!(reg.role_of(1), Some(TileRole::Start));
        assert_eq!(reg.role_of(3), Some(TileRole::Wall));
        // Second row of the logic atlas wraps back to the same columns.
        assert_eq!(reg.role_of(8), Some(TileRole::Wall));
        // Decoration tiles never have a role.
        assert_eq!(reg.role_of(28), None);
    }

    #[test]
    fn zero_column_placeholder_resolves_no_role() {
        let mut reg = TilesetRegistry::new();
        reg.push(tileset("ts_main", 1, 0));
        assert!(reg.resolve(3).is_some());
        assert!(reg.role_of(3).is_none());
    }
}
