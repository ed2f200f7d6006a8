//! TMX map loader.
//!
//! Parses the subset of Tiled's XML map format the game uses: map
//! dimensions, tileset declarations (inline or external `.tsx`), CSV tile
//! layers, and the `text` object group. The parse is one-shot and
//! deterministic; recoverable data problems (unreadable cells, duplicate
//! spawn markers, missing atlas files) are logged and tolerated, while a
//! map without any tile layer is a hard failure.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use macroquad::math::{vec2, Rect, Vec2};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::MapError;
use crate::grid::TileGrid;
use crate::map::{Map, MapText, TILE_SIZE};
use crate::tile::{RawGid, Rotation, TileRole};
use crate::tileset::{Tileset, TilesetRegistry};

/// Fixed asset root external tileset descriptions and their images are
/// resolved under, regardless of how the map file references them.
const TILESET_ROOT: &str = "assets/tilesets";

/// External tileset description (`.tsx`), a flat single-element document.
#[derive(Deserialize)]
struct RawTsx {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@tilewidth", default)]
    tile_width: u32,
    #[serde(rename = "@tileheight", default)]
    tile_height: u32,
    #[serde(rename = "@tilecount", default)]
    tile_count: u32,
    #[serde(rename = "@columns", default)]
    columns: u32,
    #[serde(default)]
    image: Option<RawTsxImage>,
}

#[derive(Deserialize)]
struct RawTsxImage {
    #[serde(rename = "@source", default)]
    source: String,
}

/// Parses a complete TMX document into a [`Map`].
pub fn load_map_str(text: &str) -> Result<Map, MapError> {
    let mut reader = Reader::from_str(text);

    let mut width = 0usize;
    let mut height = 0usize;
    let mut registry = TilesetRegistry::new();
    // Layer bodies are collected first; normalization into the grid needs
    // the map dimensions, which the <map> tag has already provided by then.
    let mut raw_layers: Vec<(String, Vec<RawGid>)> = Vec::new();
    let mut texts: Vec<MapText> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(tag) => match tag.name().as_ref() {
                b"map" => {
                    width = attr_parse(&tag, "width").unwrap_or(0);
                    height = attr_parse(&tag, "height").unwrap_or(0);
                }
                b"tileset" => {
                    let ts = parse_tileset(&mut reader, &tag, true)?;
                    registry.push(ts);
                }
                b"layer" => {
                    let layer = parse_layer(&mut reader, &tag)?;
                    raw_layers.push(layer);
                }
                b"objectgroup" => {
                    if attr_str(&tag, "name").as_deref() == Some("text") {
                        parse_text_objects(&mut reader, &mut texts)?;
                    } else {
                        reader.read_to_end(tag.name())?;
                    }
                }
                _ => {}
            },
            Event::Empty(tag) => {
                if tag.name().as_ref() == b"tileset" {
                    let ts = parse_tileset(&mut reader, &tag, false)?;
                    registry.push(ts);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if raw_layers.is_empty() {
        return Err(MapError::NoLayers);
    }

    let mut grid = TileGrid::new(width, height);
    for (name, cells) in raw_layers {
        grid.push_layer(name, cells);
    }

    let (start_position, finish_areas) = extract_markers(&grid, &registry);

    Ok(Map {
        grid,
        tilesets: registry,
        start_position,
        finish_areas,
        texts,
    })
}

/// Parses one `<tileset>` declaration. External declarations are resolved
/// under [`TILESET_ROOT`]; an unreadable description file keeps the
/// declaration as a zero-geometry placeholder so later gid ranges stay
/// stable.
fn parse_tileset(
    reader: &mut Reader<&[u8]>,
    tag: &BytesStart,
    has_children: bool,
) -> Result<Tileset, MapError> {
    let first_gid = attr_parse(tag, "firstgid").unwrap_or(0);

    if let Some(source) = attr_str(tag, "source") {
        if has_children {
            reader.read_to_end(tag.name())?;
        }
        return Ok(match load_external_tileset(first_gid, &source) {
            Ok(ts) => ts,
            Err(err) => {
                warn!("failed to read external tileset {source}: {err}");
                Tileset {
                    first_gid,
                    name: String::new(),
                    tile_width: 0,
                    tile_height: 0,
                    tile_count: 0,
                    columns: 0,
                    image: String::new(),
                    texture: None,
                }
            }
        });
    }

    // Inline tileset: geometry on the tag itself, image as a child element.
    let mut image = String::new();
    if has_children {
        loop {
            match reader.read_event()? {
                Event::Start(child) | Event::Empty(child) => {
                    if child.name().as_ref() == b"image" {
                        if let Some(source) = attr_str(&child, "source") {
                            image = tileset_asset_path(&source)
                                .to_string_lossy()
                                .into_owned();
                        }
                    }
                }
                Event::End(end) if end.name().as_ref() == b"tileset" => break,
                Event::Eof => return Err(MapError::Truncated("tileset")),
                _ => {}
            }
        }
    }

    Ok(Tileset {
        first_gid,
        name: attr_str(tag, "name").unwrap_or_default(),
        tile_width: attr_parse(tag, "tilewidth").unwrap_or(0),
        tile_height: attr_parse(tag, "tileheight").unwrap_or(0),
        tile_count: attr_parse(tag, "tilecount").unwrap_or(0),
        columns: attr_parse(tag, "columns").unwrap_or(0),
        image,
        texture: None,
    })
}

fn load_external_tileset(first_gid: u32, source: &str) -> Result<Tileset, MapError> {
    let path = tileset_asset_path(source);
    let text = std::fs::read_to_string(&path)?;
    let raw: RawTsx = quick_xml::de::from_str(&text)?;
    Ok(Tileset {
        first_gid,
        name: raw.name,
        tile_width: raw.tile_width,
        tile_height: raw.tile_height,
        tile_count: raw.tile_count,
        columns: raw.columns,
        image: raw
            .image
            .map(|img| tileset_asset_path(&img.source).to_string_lossy().into_owned())
            .unwrap_or_default(),
        texture: None,
    })
}

/// Maps any tileset-relative reference to the fixed asset root, keeping
/// only the file name.
fn tileset_asset_path(source: &str) -> PathBuf {
    let file_name = source
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(source);
    Path::new(TILESET_ROOT).join(file_name)
}

/// Parses one `<layer>`: the name attribute plus the CSV body of its
/// `<data>` child.
fn parse_layer(
    reader: &mut Reader<&[u8]>,
    tag: &BytesStart,
) -> Result<(String, Vec<RawGid>), MapError> {
    let name = attr_str(tag, "name").unwrap_or_default();
    let mut cells = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(child) if child.name().as_ref() == b"data" => {
                let body = reader.read_text(child.name())?;
                cells = parse_csv_cells(&body, &name);
            }
            Event::End(end) if end.name().as_ref() == b"layer" => break,
            Event::Eof => return Err(MapError::Truncated("layer")),
            _ => {}
        }
    }

    Ok((name, cells))
}

/// Parses a CSV tile-data body. Blank lines are skipped; a cell that does
/// not read as a number becomes an empty tile with a warning, never a
/// failure.
fn parse_csv_cells(body: &str, layer: &str) -> Vec<RawGid> {
    let mut cells = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        for cell in line.split(',') {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match u32::from_str(cell) {
                Ok(value) => cells.push(RawGid(value)),
                Err(_) => {
                    warn!("layer {layer:?}: unreadable tile value {cell:?}, treating as empty");
                    cells.push(RawGid(0));
                }
            }
        }
    }
    cells
}

/// Parses the objects of the `text` object group. Objects without inner
/// text content are dropped.
fn parse_text_objects(
    reader: &mut Reader<&[u8]>,
    texts: &mut Vec<MapText>,
) -> Result<(), MapError> {
    loop {
        match reader.read_event()? {
            Event::Start(tag) if tag.name().as_ref() == b"object" => {
                let name = attr_str(&tag, "name").unwrap_or_default();
                let position = vec2(
                    attr_parse(&tag, "x").unwrap_or(0.0),
                    attr_parse(&tag, "y").unwrap_or(0.0),
                );
                let size = vec2(
                    attr_parse(&tag, "width").unwrap_or(0.0),
                    attr_parse(&tag, "height").unwrap_or(0.0),
                );
                let mut content = String::new();
                loop {
                    match reader.read_event()? {
                        Event::Start(child) if child.name().as_ref() == b"text" => {
                            content = reader.read_text(child.name())?.trim().to_owned();
                        }
                        Event::End(end) if end.name().as_ref() == b"object" => break,
                        Event::Eof => return Err(MapError::Truncated("object")),
                        _ => {}
                    }
                }
                if !content.is_empty() {
                    texts.push(MapText {
                        name,
                        position,
                        size,
                        content,
                    });
                }
            }
            Event::End(end) if end.name().as_ref() == b"objectgroup" => break,
            Event::Eof => return Err(MapError::Truncated("objectgroup")),
            _ => {}
        }
    }
    Ok(())
}

/// Scans all layers for spawn and goal markers. The first Start tile wins;
/// later ones are a content problem worth a warning, nothing more. Every
/// Finish tile contributes one thin trigger strip oriented by its decoded
/// rotation.
fn extract_markers(grid: &TileGrid, registry: &TilesetRegistry) -> (Vec2, Vec<Rect>) {
    let mut start = vec2(100.0, 100.0);
    let mut spawn_count = 0u32;
    let mut finish_areas = Vec::new();

    for layer_idx in 0..grid.layers().len() {
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let raw = grid.cell(layer_idx, col, row);
                if raw.is_empty() {
                    continue;
                }
                match registry.role_of(raw.clean()) {
                    Some(TileRole::Start) => {
                        if spawn_count == 0 {
                            start = vec2(
                                col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                                row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                            );
                        } else {
                            warn!("multiple spawn points found, keeping the first");
                        }
                        spawn_count += 1;
                    }
                    Some(TileRole::Finish) => {
                        finish_areas.push(finish_strip(col, row, raw.rotation()));
                    }
                    _ => {}
                }
            }
        }
    }

    (start, finish_areas)
}

/// A finish tile triggers on a 1 px strip along one tile edge, so a level
/// author can orient a one-tile-thick finish line by rotating the glyph.
fn finish_strip(col: usize, row: usize, rotation: Rotation) -> Rect {
    let x = col as f32 * TILE_SIZE;
    let y = row as f32 * TILE_SIZE;
    match rotation {
        Rotation::Deg0 => Rect::new(x, y, TILE_SIZE, 1.0),
        Rotation::Deg90 => Rect::new(x + TILE_SIZE - 1.0, y, 1.0, TILE_SIZE),
        Rotation::Deg180 => Rect::new(x, y + TILE_SIZE - 1.0, TILE_SIZE, 1.0),
        Rotation::Deg270 => Rect::new(x, y, 1.0, TILE_SIZE),
    }
}

fn attr_str(tag: &BytesStart, name: &str) -> Option<String> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn attr_parse<T: FromStr>(tag: &BytesStart, name: &str) -> Option<T> {
    attr_str(tag, name).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_references_resolve_under_the_asset_root() {
        assert_eq!(
            tileset_asset_path("../tilesets/ts_main.tsx"),
            Path::new("assets/tilesets/ts_main.tsx")
        );
        assert_eq!(
            tileset_asset_path("ts_main.tsx"),
            Path::new("assets/tilesets/ts_main.tsx")
        );
        assert_eq!(
            tileset_asset_path("C:\\maps\\ts_main.tsx"),
            Path::new("assets/tilesets/ts_main.tsx")
        );
    }

    #[test]
    fn csv_tolerates_blanks_and_garbage() {
        let cells = parse_csv_cells("1,2,3\n\n   \n4,oops,6\n7,8,9,\n", "main");
        let values: Vec<u32> = cells.iter().map(|c| c.raw()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 0, 6, 7, 8, 9]);
    }

    #[test]
    fn csv_keeps_flip_flags() {
        let cells = parse_csv_cells("2684354562", "main");
        assert_eq!(cells[0].clean(), 2);
        assert!(cells[0].flip_d() && cells[0].flip_h());
    }

    #[test]
    fn finish_strip_orientations() {
        assert_eq!(
            finish_strip(1, 1, Rotation::Deg0),
            Rect::new(32.0, 32.0, 32.0, 1.0)
        );
        assert_eq!(
            finish_strip(1, 1, Rotation::Deg90),
            Rect::new(63.0, 32.0, 1.0, 32.0)
        );
        assert_eq!(
            finish_strip(1, 1, Rotation::Deg180),
            Rect::new(32.0, 63.0, 32.0, 1.0)
        );
        assert_eq!(
            finish_strip(1, 1, Rotation::Deg270),
            Rect::new(32.0, 32.0, 1.0, 32.0)
        );
    }
}
