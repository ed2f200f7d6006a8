//! Raw tile references as they appear in layer data.
//!
//! A cell holds a 32-bit value: 0 means "no tile here", anything else is a
//! global tile id with up to three flip flags packed into the high bits.
//! The flags are stripped at every point that does id arithmetic; only the
//! renderer and the goal-strip decoder ever look at them.

/// Horizontal flip flag (bit 31).
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip flag (bit 30).
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip flag (bit 29), used together with H/V to encode rotations.
pub const FLIP_D: u32 = 0x2000_0000;
/// Mask keeping the lower 29 bits of a raw cell value (bit 28 is unused).
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// One cell of layer data: a global tile id plus flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawGid(pub u32);

impl RawGid {
    /// The value as stored in the map source, flags included.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The global tile id with flip flags masked off.
    #[inline]
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }

    /// True for the "no tile here" cell value.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Horizontal flip flag.
    #[inline]
    pub fn flip_h(self) -> bool {
        (self.0 & FLIP_H) != 0
    }

    /// Vertical flip flag.
    #[inline]
    pub fn flip_v(self) -> bool {
        (self.0 & FLIP_V) != 0
    }

    /// Diagonal flip flag.
    #[inline]
    pub fn flip_d(self) -> bool {
        (self.0 & FLIP_D) != 0
    }

    /// The rotation this cell's flag combination stands for.
    #[inline]
    pub fn rotation(self) -> Rotation {
        Rotation::from_flips(self.flip_d(), self.flip_h(), self.flip_v())
    }
}

/// Functional meaning of a tile, given by its column inside the logic atlas.
///
/// The discriminants are the column indices and must not be reordered; level
/// content is authored against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileRole {
    /// Player spawn marker.
    Start = 0,
    /// Goal trigger; orientation comes from the cell's flip flags.
    Finish = 1,
    /// Solid in every direction.
    Wall = 2,
    /// Solid only for downward landings.
    Platform = 3,
    /// Hazard with an inset hitbox.
    Spikes = 4,
}

impl TileRole {
    /// Maps a logic-atlas column index to a role. Columns past the known
    /// range carry no role.
    pub fn from_column(column: u32) -> Option<TileRole> {
        match column {
            0 => Some(TileRole::Start),
            1 => Some(TileRole::Finish),
            2 => Some(TileRole::Wall),
            3 => Some(TileRole::Platform),
            4 => Some(TileRole::Spikes),
            _ => None,
        }
    }
}

/// Tile rotation decoded from the (diagonal, horizontal, vertical) flip
/// flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Decode table for the flag triple, in (diagonal, horizontal, vertical)
    /// order. The four exact combinations are the standard rotations; a lone
    /// horizontal or vertical flip falls back to 0deg / 180deg. This mapping
    /// is a contract with the level content, not derived geometry.
    pub fn from_flips(diagonal: bool, horizontal: bool, vertical: bool) -> Rotation {
        match (diagonal, horizontal, vertical) {
            (false, false, false) => Rotation::Deg0,
            (true, true, false) => Rotation::Deg90,
            (false, true, true) => Rotation::Deg180,
            (true, false, true) => Rotation::Deg270,
            (_, true, _) => Rotation::Deg0,
            (_, _, true) => Rotation::Deg180,
            _ => Rotation::Deg0,
        }
    }

    /// Rotation angle in radians, for the draw boundary.
    pub fn radians(self) -> f32 {
        use std::f32::consts::PI;
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => PI / 2.0,
            Rotation::Deg180 => PI,
            Rotation::Deg270 => PI * 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_flags_off_the_id() {
        let gid = RawGid(FLIP_H | FLIP_V | FLIP_D | 42);
        assert_eq!(gid.clean(), 42);
        assert!(gid.flip_h() && gid.flip_v() && gid.flip_d());
        assert!(!gid.is_empty());
        assert!(RawGid(0).is_empty());
    }

    #[test]
    fn plain_gid_has_no_flags() {
        let gid = RawGid(7);
        assert!(!gid.flip_h());
        assert!(!gid.flip_v());
        assert!(!gid.flip_d());
        assert_eq!(gid.clean(), 7);
    }

    #[test]
    fn rotation_decode_table() {
        assert_eq!(Rotation::from_flips(false, false, false), Rotation::Deg0);
        assert_eq!(Rotation::from_flips(true, true, false), Rotation::Deg90);
        assert_eq!(Rotation::from_flips(false, true, true), Rotation::Deg180);
        assert_eq!(Rotation::from_flips(true, false, true), Rotation::Deg270);
        // Mirrored-only cases fall back instead of deriving a rotation.
        assert_eq!(Rotation::from_flips(false, true, false), Rotation::Deg0);
        assert_eq!(Rotation::from_flips(false, false, true), Rotation::Deg180);
        assert_eq!(Rotation::from_flips(true, true, true), Rotation::Deg0);
        assert_eq!(Rotation::from_flips(true, false, false), Rotation::Deg0);
    }

    #[test]
    fn role_columns() {
        assert_eq!(TileRole::from_column(0), Some(TileRole::Start));
        assert_eq!(TileRole::from_column(2), Some(TileRole::Wall));
        assert_eq!(TileRole::from_column(4), Some(TileRole::Spikes));
        assert_eq!(TileRole::from_column(5), None);
    }
}
