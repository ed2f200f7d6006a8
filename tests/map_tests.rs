// tests/map_tests.rs

use cloudhop::{Map, TileRole};
use macroquad::math::Rect;

fn tmx(width: u32, height: u32, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map width="{width}" height="{height}" tilewidth="32" tileheight="32">
 <tileset firstgid="1" name="ts_main" tilewidth="32" tileheight="32" tilecount="25" columns="5">
  <image source="tiles.png" width="160" height="160"/>
 </tileset>
{body}
</map>"#
    )
}

fn layer(name: &str, csv: &str) -> String {
    format!("<layer id=\"1\" name=\"{name}\"><data encoding=\"csv\">\n{csv}\n</data></layer>")
}

fn map_from(width: u32, height: u32, csv: &str) -> Map {
    Map::load_from_str(&tmx(width, height, &layer("main", csv))).unwrap()
}

#[test]
fn wall_query_returns_the_covered_tile_rect() {
    // Single wall tile (gid 3) in the middle of a 3x3 grid.
    let map = map_from(3, 3, "0,0,0,\n0,3,0,\n0,0,0");

    let walls = map.walls_in(Rect::new(24.0, 24.0, 16.0, 16.0));
    assert_eq!(walls, vec![Rect::new(32.0, 32.0, 32.0, 32.0)]);
}

#[test]
fn queries_over_empty_space_return_nothing() {
    let map = map_from(3, 3, "0,0,0,\n0,3,0,\n0,0,0");

    assert!(map.walls_in(Rect::new(70.0, 70.0, 16.0, 16.0)).is_empty());
    assert!(map.platforms_in(Rect::new(0.0, 0.0, 96.0, 96.0)).is_empty());
    // Windows entirely outside the grid clamp to the edge tiles, which are
    // empty here.
    assert!(map.walls_in(Rect::new(-500.0, -500.0, 10.0, 10.0)).is_empty());
    assert!(map.walls_in(Rect::new(900.0, 900.0, 10.0, 10.0)).is_empty());
}

#[test]
fn gid_below_every_tileset_has_no_role() {
    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map width="2" height="1" tilewidth="32" tileheight="32">
 <tileset firstgid="5" name="ts_main" tilewidth="32" tileheight="32" tilecount="25" columns="5">
  <image source="tiles.png"/>
 </tileset>
 {}
</map>"#,
        layer("main", "1,7")
    );
    let map = Map::load_from_str(&doc).unwrap();

    assert!(map.tilesets().resolve(1).is_none());
    assert_eq!(map.tilesets().role_of(1), None);
    // gid 7 is column 2 of the shifted logic atlas, a wall.
    assert_eq!(map.tilesets().role_of(7), Some(TileRole::Wall));
    assert_eq!(map.walls_in(Rect::new(0.0, 0.0, 64.0, 32.0)).len(), 1);
}

#[test]
fn spike_hitboxes_are_inset() {
    // Spikes (gid 5) at column 1, row 1.
    let map = map_from(3, 3, "0,0,0,\n0,5,0,\n0,0,0");

    let spikes = map.tiles_with_role(Rect::new(32.0, 32.0, 32.0, 32.0), TileRole::Spikes);
    assert_eq!(spikes, vec![Rect::new(36.0, 42.0, 24.0, 22.0)]);

    // Grazing the un-inset border of the tile is not a hit.
    assert!(!map.touches_spikes(Rect::new(32.0, 32.0, 3.0, 3.0)));
    assert!(!map.touches_spikes(Rect::new(32.0, 32.0, 32.0, 9.0)));
    // Reaching into the inset box is.
    assert!(map.touches_spikes(Rect::new(40.0, 48.0, 8.0, 8.0)));
}

#[test]
fn platforms_and_walls_are_distinct_roles() {
    // Wall (3) next to a platform (4).
    let map = map_from(2, 1, "3,4");
    let everything = Rect::new(0.0, 0.0, 64.0, 32.0);

    assert_eq!(map.walls_in(everything), vec![Rect::new(0.0, 0.0, 32.0, 32.0)]);
    assert_eq!(
        map.platforms_in(everything),
        vec![Rect::new(32.0, 0.0, 32.0, 32.0)]
    );
}

#[test]
fn queries_scan_every_layer() {
    let body = format!(
        "{}{}",
        layer("back", "0,0,\n3,0"),
        layer("front", "0,3,\n0,0")
    );
    let map = Map::load_from_str(&tmx(2, 2, &body)).unwrap();

    let walls = map.walls_in(Rect::new(0.0, 0.0, 64.0, 64.0));
    assert_eq!(walls.len(), 2);
    assert!(walls.contains(&Rect::new(0.0, 32.0, 32.0, 32.0)));
    assert!(walls.contains(&Rect::new(32.0, 0.0, 32.0, 32.0)));
}

#[test]
fn finish_detection_uses_the_trigger_strip() {
    // Unrotated finish (gid 2) at column 1, row 0: strip on the top edge.
    let map = map_from(2, 1, "0,2");

    assert!(map.reaches_finish(Rect::new(40.0, -10.0, 16.0, 12.0)));
    // Below the 1 px strip, inside the tile body: no trigger.
    assert!(!map.reaches_finish(Rect::new(40.0, 8.0, 16.0, 16.0)));
}

#[test]
fn pixel_dimensions_derive_from_the_grid() {
    let map = map_from(3, 2, "0,0,0,\n0,0,0");
    assert_eq!(map.width_px(), 96.0);
    assert_eq!(map.height_px(), 64.0);
}
