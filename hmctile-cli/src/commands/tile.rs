//! Tile commands - inspect tile ids and locate coordinates.

use hmctile::coord::{tile_id_from_coordinates, TileId};

use crate::error::CliError;

/// Print level, column, row, quadkey and bounds of a tile id.
pub fn run_tile(id: &str) -> Result<(), CliError> {
    let id: TileId = id.parse()?;
    let tile = id.tile()?;
    let bounds = tile.bounds();
    let (center_lat, center_lng) = bounds.center();

    println!("Tile {}", id);
    println!("  Level:   {}", tile.level);
    println!("  Column:  {}", tile.x);
    println!("  Row:     {}", tile.y);
    println!("  Quadkey: {}", tile.quadkey());
    println!(
        "  Bounds:  west={} south={} east={} north={}",
        bounds.west, bounds.south, bounds.east, bounds.north
    );
    println!("  Center:  lat={} lng={}", center_lat, center_lng);
    if let Some(parent) = tile.parent() {
        println!("  Parent:  {}", parent.id());
    }
    Ok(())
}

/// Print the id of the tile containing a coordinate.
pub fn run_locate(lat: f64, lng: f64, level: u8) -> Result<(), CliError> {
    let id = tile_id_from_coordinates(lat, lng, level)?;
    println!("{}", id);
    Ok(())
}
