//! Tile grid store: named layers over one shared set of dimensions.

use crate::tile::RawGid;

/// One tile layer, row-major, exactly `width * height` cells.
pub struct Layer {
    /// Layer name from the map source (`main`, `textures`, ...).
    pub name: String,
    data: Vec<RawGid>,
}

impl Layer {
    /// Raw cells in row-major order.
    pub fn data(&self) -> &[RawGid] {
        &self.data
    }
}

/// The loaded tile layers of a map. All layers share `width`/`height`; the
/// loader normalizes ragged source rows before anything lands here.
#[derive(Default)]
pub struct TileGrid {
    width: usize,
    height: usize,
    layers: Vec<Layer>,
}

impl TileGrid {
    /// Empty grid with the given dimensions in tiles.
    pub fn new(width: usize, height: usize) -> Self {
        TileGrid {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when no tile layer was loaded.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Loaded layers, in source order (first is drawn furthest back).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Adds a layer, padding or truncating `cells` to the grid dimensions so
    /// the shared-size invariant holds.
    pub fn push_layer(&mut self, name: String, mut cells: Vec<RawGid>) {
        cells.resize(self.width * self.height, RawGid(0));
        self.layers.push(Layer { name, data: cells });
    }

    /// Cell lookup; out-of-range coordinates read as empty.
    pub fn cell(&self, layer: usize, col: usize, row: usize) -> RawGid {
        if col >= self.width || row >= self.height {
            return RawGid(0);
        }
        self.layers
            .get(layer)
            .map(|l| l.data[row * self.width + col])
            .unwrap_or(RawGid(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_layers_are_padded_to_grid_size() {
        let mut grid = TileGrid::new(3, 2);
        grid.push_layer("main".into(), vec![RawGid(1), RawGid(2)]);
        assert_eq!(grid.layers()[0].data().len(), 6);
        assert_eq!(grid.cell(0, 1, 0), RawGid(2));
        assert_eq!(grid.cell(0, 2, 1), RawGid(0));
    }

    #[test]
    fn long_layers_are_truncated() {
        let mut grid = TileGrid::new(1, 1);
        grid.push_layer("main".into(), vec![RawGid(9), RawGid(8), RawGid(7)]);
        assert_eq!(grid.layers()[0].data(), &[RawGid(9)]);
    }

    #[test]
    fn out_of_range_reads_are_empty() {
        let mut grid = TileGrid::new(2, 2);
        grid.push_layer("main".into(), vec![RawGid(5); 4]);
        assert_eq!(grid.cell(0, 2, 0), RawGid(0));
        assert_eq!(grid.cell(0, 0, 2), RawGid(0));
        assert_eq!(grid.cell(1, 0, 0), RawGid(0));
    }
}
