#![no_main]

use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use cwstate::bank::{
    BankDefs, Banks, Commander, Country, MovementType, PropertyBank, Terrain, TileTypeDef,
    UnitTypeDef,
};
use cwstate::game::{check_invariants, Coord, Map, UnitId};
use libfuzzer_sys::fuzz_target;

fn content() -> Arc<Banks> {
    static BANKS: OnceLock<Arc<Banks>> = OnceLock::new();
    Arc::clone(BANKS.get_or_init(|| {
        let defs = BankDefs {
            countries: PropertyBank::from_entries(
                "country",
                [("orange", Country::default()), ("blue", Country::default())],
            )
            .unwrap(),
            terrains: PropertyBank::from_entries(
                "terrain",
                [("plains", Terrain::default()), ("city", Terrain { max_hp: 20, ..Terrain::default() })],
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
                [("foot", MovementType::default())],
            )
            .unwrap(),
            unit_types: PropertyBank::from_entries(
                "unit type",
                [
                    ("infantry", UnitTypeDef { max_fuel: 99, ..UnitTypeDef::default() }),
                    ("apc", UnitTypeDef { max_ammo: -1, can_load: vec![0], ..UnitTypeDef::default() }),
                ],
            )
            .unwrap(),
            commanders: PropertyBank::from_entries("commander", [("jake", Commander::default())])
                .unwrap(),
        };
        Arc::new(Banks::link(defs).unwrap())
    }))
}

/// One map operation with raw arguments.
#[derive(Arbitrary, Debug)]
enum Op {
    CreateArmy(u8),
    DeleteArmy(u8),
    CreateUnit(u8, u8),
    DeleteUnit(u8),
    Move(u8, u8, u8),
    Load(u8, u8),
    Unload(u8, u8, u8, u8),
    TileType(u8, u8, u8),
    TileOwner(u8, u8, Option<u8>),
    Capture(u8),
    Replenish(u8, bool),
    Resize(u8, u8),
    DeleteRect(u8, u8, u8, u8),
}

fn unit(raw: u8) -> UnitId {
    UnitId::new(u32::from(raw)).unwrap_or(UnitId::FIRST)
}

fn pos(x: u8, y: u8) -> Coord {
    Coord::new(u32::from(x % 16), u32::from(y % 16))
}

fuzz_target!(|ops: Vec<Op>| {
    let mut map = Map::new(content());
    map.set_map_size(8, 8, Some(0));

    for op in &ops {
        match *op {
            Op::CreateArmy(a) => {
                map.create_army(u32::from(a % 4));
            }
            Op::DeleteArmy(a) => {
                map.delete_army(u32::from(a % 4));
            }
            Op::CreateUnit(t, a) => {
                map.create_unit(u32::from(t % 3), u32::from(a % 4));
            }
            Op::DeleteUnit(u) => {
                map.delete_unit(unit(u));
            }
            Op::Move(u, x, y) => {
                map.set_unit_position(unit(u), pos(x, y));
            }
            Op::Load(a, b) => {
                map.load_unit(unit(a), unit(b));
            }
            Op::Unload(a, b, x, y) => {
                map.unload_unit(unit(a), unit(b), pos(x, y));
            }
            Op::TileType(x, y, t) => {
                map.set_tile_type(pos(x, y), u32::from(t % 3));
            }
            Op::TileOwner(x, y, a) => {
                map.set_tile_owner(pos(x, y), a.map(|a| u32::from(a % 4)));
            }
            Op::Capture(u) => {
                map.unit_capturing(unit(u), true);
            }
            Op::Replenish(u, heal) => {
                map.replenish_unit(unit(u), heal);
            }
            Op::Resize(w, h) => {
                map.set_map_size(u32::from(w % 16), u32::from(h % 16), Some(1));
            }
            Op::DeleteRect(x0, y0, x1, y1) => {
                map.rectangle_delete_units(pos(x0, y0), pos(x1, y1));
            }
        }
        let violations = check_invariants(&map);
        assert!(violations.is_empty(), "after {op:?}: {violations:?}");
    }

    let bytes = map.save_to_bytes(1).unwrap();
    let mut loaded = Map::new(content());
    loaded.load_from_bytes(&bytes).unwrap();
    assert_eq!(loaded.to_record(), map.to_record());
});
