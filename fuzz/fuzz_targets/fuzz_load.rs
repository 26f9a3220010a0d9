#![no_main]

use std::sync::{Arc, OnceLock};

use cwstate::bank::{
    BankDefs, Banks, Commander, Country, MovementType, PropertyBank, Terrain, TileTypeDef,
    UnitTypeDef,
};
use cwstate::cwm::BASE_MAGIC;
use cwstate::game::{check_invariants, Map};
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
            terrains: PropertyBank::from_entries("terrain", [("plains", Terrain::default())])
                .unwrap(),
            tile_types: PropertyBank::from_entries("tile type", [("plains", TileTypeDef::default())])
                .unwrap(),
            movement_types: PropertyBank::from_entries(
                "movement type",
                [("foot", MovementType::default())],
            )
            .unwrap(),
            unit_types: PropertyBank::from_entries(
                "unit type",
                [
                    ("infantry", UnitTypeDef::default()),
                    ("apc", UnitTypeDef { can_load: vec![0], ..UnitTypeDef::default() }),
                ],
            )
            .unwrap(),
            commanders: PropertyBank::from_entries("commander", [("jake", Commander::default())])
                .unwrap(),
        };
        Arc::new(Banks::link(defs).unwrap())
    }))
}

fuzz_target!(|data: &[u8]| {
    // Give most inputs a valid header so the body parser gets exercised.
    let mut bytes = Vec::with_capacity(data.len() + 4);
    if let Some((&version, body)) = data.split_first() {
        bytes.extend_from_slice(&(BASE_MAGIC + u32::from(version % 3)).to_le_bytes());
        bytes.extend_from_slice(body);
    }

    let mut map = Map::new(content());
    let before = map.to_record();
    match map.load_from_bytes(&bytes) {
        Ok(_) => {
            let violations = check_invariants(&map);
            assert!(violations.is_empty(), "invariants broken after load: {violations:?}");
            // Whatever loads must save and load again.
            let saved = map.save_to_bytes(1).unwrap();
            let mut reloaded = Map::new(content());
            reloaded.load_from_bytes(&saved).unwrap();
            assert_eq!(reloaded.to_record(), map.to_record());
        }
        Err(_) => assert_eq!(map.to_record(), before),
    }
});
