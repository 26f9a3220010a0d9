//! Map invariants - consistency checks that detect bugs.
//!
//! Every public [`Map`] operation is meant to keep these intact. A violation
//! means some operation updated one side of a relationship without the other.

use std::collections::BTreeSet;

use crate::game::{Coord, Map};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all map invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(map: &Map) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    if Some(map.tiles.len()) != super::map::tile_count(map.width, map.height) {
        report(format!(
            "{} tiles stored for a {}x{} map",
            map.tiles.len(),
            map.width,
            map.height
        ));
    }

    // Tiles.
    for (pos, tile) in map.tiles() {
        if let Some(id) = tile.unit {
            match map.units.get(&id) {
                None => report(format!("Tile {pos} records missing unit {id}")),
                // A stale record is allowed for units that left the grid.
                Some(unit) if unit.position.is_some() && unit.position != Some(pos) => {
                    report(format!(
                        "Tile {pos} records unit {id}, which stands at {:?}",
                        unit.position
                    ));
                }
                Some(_) => {}
            }
        }
        if let Some(owner) = tile.owner {
            if !map.armies.get(&owner).is_some_and(|a| a.tiles.contains(&pos)) {
                report(format!(
                    "Tile {pos} is owned by army {owner}, which does not list it"
                ));
            }
        }
    }

    // Armies.
    for (&id, army) in &map.armies {
        if army.country() != id {
            report(format!("Army {id} plays as country {}", army.country()));
        }
        if army.funds() < 0 {
            report(format!("Army {id} has negative funds {}", army.funds()));
        }
        for unit in &army.units {
            match map.units.get(unit) {
                None => report(format!("Army {id} lists missing unit {unit}")),
                Some(u) if u.army() != id => {
                    report(format!("Army {id} lists unit {unit} of army {}", u.army()));
                }
                Some(_) => {}
            }
        }
        for &pos in &army.tiles {
            if map.tile(pos).and_then(|t| t.owner) != Some(id) {
                report(format!("Army {id} lists tile {pos}, which it does not own"));
            }
        }
        if army.tag_co().is_some() && army.current_co().is_none() {
            report(format!("Army {id} has a tag commander but no current one"));
        }
    }

    // Units.
    let mut occupied: BTreeSet<Coord> = BTreeSet::new();
    for (&id, unit) in &map.units {
        if !map
            .armies
            .get(&unit.army())
            .is_some_and(|a| a.units.contains(&id))
        {
            report(format!(
                "Unit {id} is not listed by its army {}",
                unit.army()
            ));
        }
        if unit.hp() < 0 || unit.fuel() < 0 || unit.ammo() < 0 {
            report(format!("Unit {id} has a negative stat"));
        }
        match (unit.position, unit.loaded_onto) {
            (Some(_), Some(transport)) => {
                report(format!(
                    "Unit {id} is both on the grid and loaded onto {transport}"
                ));
            }
            (Some(pos), None) => {
                if !occupied.insert(pos) {
                    report(format!("Unit {id} shares tile {pos} with another unit"));
                }
                if map.tile(pos).and_then(|t| t.unit) != Some(id) {
                    report(format!("Unit {id} stands at {pos}, which does not record it"));
                }
            }
            (None, Some(transport)) => {
                if !map
                    .units
                    .get(&transport)
                    .is_some_and(|t| t.cargo.contains(&id))
                {
                    report(format!(
                        "Unit {id} is loaded onto {transport}, which does not carry it"
                    ));
                }
            }
            (None, None) => {}
        }
        for loaded in &unit.cargo {
            if map.units.get(loaded).and_then(|u| u.loaded_onto) != Some(id) {
                report(format!("Unit {id} carries {loaded}, which is not loaded onto it"));
            }
        }
    }

    // Selection.
    if !map.tiles.is_empty() && !map.in_bounds(map.selected_tile) {
        report(format!("Selected tile {} is out of bounds", map.selected_tile));
    }
    if let Some(army) = map.selected_army {
        if !map.armies.contains_key(&army) {
            report(format!("Selected army {army} does not exist"));
        }
    }

    violations
}

/// Assert all map invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(map: &Map) {
    let violations = check_invariants(map);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Map invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_map: &Map) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{sample_map, APC, INFANTRY, ORANGE};
    use crate::game::UnitId;

    fn create_valid_map() -> Map {
        let mut map = sample_map(4, 4);
        map.create_army(ORANGE);
        let apc = map.create_unit(APC, ORANGE).unwrap();
        let infantry = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(apc, Coord::new(1, 1));
        map.load_unit(infantry, apc);
        map.set_tile_owner(Coord::new(3, 3), Some(ORANGE));
        map
    }

    #[test]
    fn test_valid_map_passes() {
        let map = create_valid_map();
        assert!(check_invariants(&map).is_empty());
        assert_invariants(&map);
    }

    #[test]
    fn test_unlisted_tile_detected() {
        let mut map = create_valid_map();
        map.armies.get_mut(&ORANGE).unwrap().tiles.clear();
        let violations = check_invariants(&map);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("does not list it"));
    }

    #[test]
    fn test_shared_tile_detected() {
        let mut map = create_valid_map();
        let extra = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.units.get_mut(&extra).unwrap().position = Some(Coord::new(1, 1));
        let violations = check_invariants(&map);
        assert!(violations.iter().any(|v| v.message.contains("shares tile")));
    }

    #[test]
    fn test_broken_cargo_link_detected() {
        let mut map = create_valid_map();
        let apc = UnitId::new(1).unwrap();
        map.units.get_mut(&apc).unwrap().cargo.clear();
        let violations = check_invariants(&map);
        assert!(violations.iter().any(|v| v.message.contains("does not carry it")));
    }

    #[test]
    fn test_missing_selected_army_detected() {
        let mut map = create_valid_map();
        map.selected_army = Some(9);
        let violations = check_invariants(&map);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].to_string().starts_with("Invariant violation"));
    }
}
