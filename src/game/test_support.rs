//! Small content set shared by the game module's unit tests.

use std::sync::Arc;

use crate::bank::{
    BankDefs, BankId, Banks, Commander, Country, MovementType, PropertyBank, Terrain,
    TileTypeDef, UnitTypeDef,
};
use crate::game::{ArmyId, Map};

pub(crate) const ORANGE: ArmyId = 0;
pub(crate) const BLUE: ArmyId = 1;

pub(crate) const PLAINS: BankId = 0;
pub(crate) const CITY: BankId = 1;

pub(crate) const INFANTRY: BankId = 0;
pub(crate) const APC: BankId = 1;

pub(crate) fn banks() -> Arc<Banks> {
    let defs = BankDefs {
        countries: PropertyBank::from_entries(
            "country",
            [("orange", Country::default()), ("blue", Country::default())],
        )
        .unwrap(),
        terrains: PropertyBank::from_entries(
            "terrain",
            [
                ("plains", Terrain::default()),
                ("city", Terrain { max_hp: 20, is_capturable: true, ..Terrain::default() }),
            ],
        )
        .unwrap(),
        tile_types: PropertyBank::from_entries(
            "tile type",
            [
                ("plains", TileTypeDef { terrain: 0, ..TileTypeDef::default() }),
                ("city", TileTypeDef { terrain: 1, ..TileTypeDef::default() }),
            ],
        )
        .unwrap(),
        movement_types: PropertyBank::from_entries(
            "movement type",
            [("foot", MovementType::default()), ("treads", MovementType::default())],
        )
        .unwrap(),
        unit_types: PropertyBank::from_entries(
            "unit type",
            [
                (
                    "infantry",
                    UnitTypeDef { max_fuel: 99, max_ammo: 0, ..UnitTypeDef::default() },
                ),
                (
                    "apc",
                    UnitTypeDef {
                        movement_type: 1,
                        max_fuel: 70,
                        max_ammo: -1,
                        can_load: vec![INFANTRY],
                        load_limit: 1,
                        ..UnitTypeDef::default()
                    },
                ),
            ],
        )
        .unwrap(),
        commanders: PropertyBank::from_entries(
            "commander",
            [("jake", Commander::default()), ("max", Commander::default())],
        )
        .unwrap(),
    };
    Arc::new(Banks::link(defs).unwrap())
}

/// A `width` x `height` map of plains with no armies.
pub(crate) fn sample_map(width: u32, height: u32) -> Map {
    let mut map = Map::new(banks());
    assert!(map.set_map_size(width, height, Some(PLAINS)));
    map
}
