//! Units and the map operations that manage them.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::bank::{BankId, UnitType};
use crate::game::{ArmyId, Coord, Map, UnitId};

/// One unit on a map.
///
/// A unit is on the grid (it has a position), loaded onto a transport, or
/// freshly created and not yet placed. It is never both on the grid and loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    unit_type: BankId,
    army: ArmyId,
    pub(super) position: Option<Coord>,
    hp: i32,
    fuel: i32,
    ammo: i32,
    waiting: bool,
    capturing: bool,
    hiding: bool,
    pub(super) cargo: BTreeSet<UnitId>,
    pub(super) loaded_onto: Option<UnitId>,
}

impl Unit {
    pub(super) const fn new(unit_type: BankId, army: ArmyId) -> Self {
        Self {
            unit_type,
            army,
            position: None,
            hp: 0,
            fuel: 0,
            ammo: 0,
            waiting: false,
            capturing: false,
            hiding: false,
            cargo: BTreeSet::new(),
            loaded_onto: None,
        }
    }

    /// Unit type ID.
    #[must_use]
    pub const fn unit_type(&self) -> BankId {
        self.unit_type
    }

    /// Owning army.
    #[must_use]
    pub const fn army(&self) -> ArmyId {
        self.army
    }

    /// Grid position, or `None` when the unit is not on the grid.
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    /// Check if the unit occupies a tile.
    #[must_use]
    pub const fn is_on_map(&self) -> bool {
        self.position.is_some()
    }

    /// HP, never negative.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Fuel, never negative.
    #[must_use]
    pub const fn fuel(&self) -> i32 {
        self.fuel
    }

    /// Ammo, never negative.
    #[must_use]
    pub const fn ammo(&self) -> i32 {
        self.ammo
    }

    /// Check if the unit has finished its turn.
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Check if the unit is capturing the tile it stands on.
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Check if the unit is hidden.
    #[must_use]
    pub const fn is_hiding(&self) -> bool {
        self.hiding
    }

    /// Units loaded directly onto this one.
    #[must_use]
    pub const fn cargo(&self) -> &BTreeSet<UnitId> {
        &self.cargo
    }

    /// Transport this unit is loaded onto.
    #[must_use]
    pub const fn loaded_onto(&self) -> Option<UnitId> {
        self.loaded_onto
    }

    fn is_replenished(&self, unit_type: &UnitType, heal: bool) -> bool {
        (unit_type.has_infinite_fuel() || self.fuel == unit_type.max_fuel())
            && (unit_type.has_infinite_ammo() || self.ammo == unit_type.max_ammo())
            && (!heal || self.hp == unit_type.max_hp())
    }

    fn replenish(&mut self, unit_type: &UnitType, heal: bool) {
        if !unit_type.has_infinite_fuel() {
            self.fuel = unit_type.max_fuel();
        }
        if !unit_type.has_infinite_ammo() {
            self.ammo = unit_type.max_ammo();
        }
        if heal {
            self.hp = unit_type.max_hp();
        }
    }
}

impl Map {
    /// Create a unit of `unit_type` for `army`. The unit starts off the grid.
    ///
    /// Returns `None` if the type or army does not exist, or if every unit ID
    /// is in use.
    pub fn create_unit(&mut self, unit_type: BankId, army: ArmyId) -> Option<UnitId> {
        if !self.banks.unit_types().contains(unit_type) {
            log::error!("create_unit cancelled: unit type {unit_type} does not exist");
            return None;
        }
        if !self.armies.contains_key(&army) {
            log::error!(
                "create_unit cancelled: attempted to create unit type {unit_type} for army \
                 {army}, which does not exist"
            );
            return None;
        }
        let units = &self.units;
        let Some(id) = self
            .unit_ids
            .allocate(units.len(), |candidate| units.contains_key(&candidate))
        else {
            log::error!("create_unit failed: every unit ID is in use");
            return None;
        };
        self.units.insert(id, Unit::new(unit_type, army));
        if let Some(owner) = self.armies.get_mut(&army) {
            owner.units.insert(id);
        }
        Some(id)
    }

    /// [`Map::create_unit`] by unit type script name.
    pub fn create_unit_by_name(&mut self, unit_type: &str, army: ArmyId) -> Option<UnitId> {
        if let Some(entry) = self.banks.unit_types().get_by_name(unit_type) {
            self.create_unit(entry.id(), army)
        } else {
            log::error!("create_unit cancelled: no unit type named \"{unit_type}\"");
            None
        }
    }

    /// Delete a unit and, recursively, everything loaded onto it.
    pub fn delete_unit(&mut self, id: UnitId) -> bool {
        if !self.units.contains_key(&id) {
            log::error!("delete_unit cancelled: unit {id} does not exist");
            return false;
        }
        self.cancel_capture(Some(id));
        let Some(unit) = self.units.get(&id) else {
            return false;
        };
        let (position, army, loaded_onto) = (unit.position, unit.army, unit.loaded_onto);
        let cargo: Vec<UnitId> = unit.cargo.iter().copied().collect();

        if let Some(tile) = position.and_then(|pos| self.tile_mut(pos)) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        if let Some(owner) = self.armies.get_mut(&army) {
            owner.units.remove(&id);
        } else {
            log::warn!("delete_unit: unit {id} had owning army {army}, which does not exist");
        }
        for loaded in cargo {
            if self.units.contains_key(&loaded) {
                self.delete_unit(loaded);
            }
        }
        if let Some(transport) = loaded_onto {
            let unloaded = self
                .units
                .get_mut(&transport)
                .is_some_and(|t| t.cargo.remove(&id));
            if !unloaded {
                log::warn!(
                    "delete_unit: unit {id} was loaded onto unit {transport}, but could not be \
                     unloaded from it"
                );
            }
        }
        self.units.remove(&id);
        true
    }

    /// Look a unit up.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Every unit, in ID order.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units.iter().map(|(&id, unit)| (id, unit))
    }

    /// Number of units, including loaded ones.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// IDs of every unit, ascending.
    #[must_use]
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    fn unit_or_log(&self, op: &str, id: UnitId) -> Option<&Unit> {
        let found = self.units.get(&id);
        if found.is_none() {
            log::error!("{op} failed: unit {id} does not exist");
        }
        found
    }

    fn unit_mut_or_log(&mut self, op: &str, id: UnitId) -> Option<&mut Unit> {
        let found = self.units.get_mut(&id);
        if found.is_none() {
            log::error!("{op} cancelled: unit {id} does not exist");
        }
        found
    }

    /// A unit's type.
    #[must_use]
    pub fn unit_type(&self, id: UnitId) -> Option<BankId> {
        self.unit_or_log("unit_type", id).map(Unit::unit_type)
    }

    /// A unit's owning army.
    #[must_use]
    pub fn army_of_unit(&self, id: UnitId) -> Option<ArmyId> {
        self.unit_or_log("army_of_unit", id).map(Unit::army)
    }

    /// A unit's grid position.
    #[must_use]
    pub fn unit_position(&self, id: UnitId) -> Option<Coord> {
        self.unit_or_log("unit_position", id).and_then(Unit::position)
    }

    /// Check if a unit occupies a tile.
    #[must_use]
    pub fn is_unit_on_map(&self, id: UnitId) -> bool {
        self.unit_or_log("is_unit_on_map", id)
            .is_some_and(Unit::is_on_map)
    }

    /// Move a unit onto a vacant tile.
    ///
    /// Moving a unit onto the tile it already occupies succeeds and changes
    /// nothing. Loaded units must be unloaded instead.
    pub fn set_unit_position(&mut self, id: UnitId, pos: Coord) -> bool {
        let Some(unit) = self.unit_or_log("set_unit_position", id) else {
            return false;
        };
        if let Some(transport) = unit.loaded_onto {
            log::error!(
                "set_unit_position cancelled: unit {id} is loaded onto unit {transport}"
            );
            return false;
        }
        if !self.in_bounds(pos) {
            log::error!(
                "set_unit_position cancelled: {pos} is out of bounds of the {}x{} map",
                self.width,
                self.height
            );
            return false;
        }
        match self.occupant(pos) {
            Some(occupant) if occupant == id => return true,
            Some(occupant) => {
                log::error!(
                    "set_unit_position cancelled: unit {id} cannot move to {pos}, which is \
                     occupied by unit {occupant}"
                );
                return false;
            }
            None => {}
        }
        self.cancel_capture(Some(id));
        if let Some(tile) = self.tile_mut(pos) {
            tile.unit = Some(id);
        }
        let old = self.units.get(&id).and_then(Unit::position);
        if let Some(tile) = old.and_then(|old| self.tile_mut(old)) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = Some(pos);
        }
        true
    }

    /// Set a unit's HP. Negative values are stored as 0.
    pub fn set_unit_hp(&mut self, id: UnitId, hp: i32) -> bool {
        let Some(unit) = self.unit_mut_or_log("set_unit_hp", id) else {
            return false;
        };
        unit.hp = hp.max(0);
        true
    }

    /// A unit's HP, or 0 if it does not exist.
    #[must_use]
    pub fn unit_hp(&self, id: UnitId) -> i32 {
        self.unit_or_log("unit_hp", id).map_or(0, Unit::hp)
    }

    /// Set a unit's fuel. Negative values are stored as 0.
    pub fn set_unit_fuel(&mut self, id: UnitId, fuel: i32) -> bool {
        let Some(unit) = self.unit_mut_or_log("set_unit_fuel", id) else {
            return false;
        };
        unit.fuel = fuel.max(0);
        true
    }

    /// Subtract `amount` from a unit's fuel.
    pub fn burn_unit_fuel(&mut self, id: UnitId, amount: i32) -> bool {
        let Some(unit) = self.unit_mut_or_log("burn_unit_fuel", id) else {
            return false;
        };
        unit.fuel = unit.fuel.saturating_sub(amount).max(0);
        true
    }

    /// A unit's fuel, or 0 if it does not exist.
    #[must_use]
    pub fn unit_fuel(&self, id: UnitId) -> i32 {
        self.unit_or_log("unit_fuel", id).map_or(0, Unit::fuel)
    }

    /// Set a unit's ammo. Negative values are stored as 0.
    pub fn set_unit_ammo(&mut self, id: UnitId, ammo: i32) -> bool {
        let Some(unit) = self.unit_mut_or_log("set_unit_ammo", id) else {
            return false;
        };
        unit.ammo = ammo.max(0);
        true
    }

    /// A unit's ammo, or 0 if it does not exist.
    #[must_use]
    pub fn unit_ammo(&self, id: UnitId) -> i32 {
        self.unit_or_log("unit_ammo", id).map_or(0, Unit::ammo)
    }

    /// Refill a unit's fuel and ammo to its type's maximum, and its HP too if
    /// `heal` is set.
    pub fn replenish_unit(&mut self, id: UnitId, heal: bool) -> bool {
        let banks = Arc::clone(&self.banks);
        let Some(unit) = self.unit_mut_or_log("replenish_unit", id) else {
            return false;
        };
        let Some(unit_type) = banks.unit_types().get(unit.unit_type) else {
            return false;
        };
        unit.replenish(unit_type, heal);
        true
    }

    /// Check if a unit has full fuel and ammo, and full HP too if `heal` is set.
    ///
    /// Infinite fuel or ammo always counts as full.
    #[must_use]
    pub fn is_unit_replenished(&self, id: UnitId, heal: bool) -> bool {
        self.unit_or_log("is_unit_replenished", id)
            .and_then(|unit| {
                let unit_type = self.banks.unit_types().get(unit.unit_type)?;
                Some(unit.is_replenished(unit_type, heal))
            })
            .unwrap_or(false)
    }

    /// Mark a unit as having finished its turn, or not.
    pub fn wait_unit(&mut self, id: UnitId, waiting: bool) -> bool {
        let Some(unit) = self.unit_mut_or_log("wait_unit", id) else {
            return false;
        };
        unit.waiting = waiting;
        true
    }

    /// Check if a unit has finished its turn.
    #[must_use]
    pub fn is_unit_waiting(&self, id: UnitId) -> bool {
        self.unit_or_log("is_unit_waiting", id)
            .is_some_and(Unit::is_waiting)
    }

    /// Mark a unit as capturing the tile it stands on, or not.
    pub fn unit_capturing(&mut self, id: UnitId, capturing: bool) -> bool {
        let Some(unit) = self.unit_mut_or_log("unit_capturing", id) else {
            return false;
        };
        unit.capturing = capturing;
        true
    }

    /// Check if a unit is capturing.
    #[must_use]
    pub fn is_unit_capturing(&self, id: UnitId) -> bool {
        self.unit_or_log("is_unit_capturing", id)
            .is_some_and(Unit::is_capturing)
    }

    /// Mark a unit as hidden, or not.
    pub fn unit_hiding(&mut self, id: UnitId, hiding: bool) -> bool {
        let Some(unit) = self.unit_mut_or_log("unit_hiding", id) else {
            return false;
        };
        unit.hiding = hiding;
        true
    }

    /// Check if a unit is hidden.
    #[must_use]
    pub fn is_unit_hiding(&self, id: UnitId) -> bool {
        self.unit_or_log("is_unit_hiding", id)
            .is_some_and(Unit::is_hiding)
    }

    /// Load `load` onto the transport `onto`, taking it off the grid.
    pub fn load_unit(&mut self, load: UnitId, onto: UnitId) -> bool {
        if !self.units.contains_key(&onto) {
            log::error!("load_unit cancelled: transport unit {onto} does not exist");
            return false;
        }
        let Some(unit) = self.unit_or_log("load_unit", load) else {
            return false;
        };
        if load == onto {
            log::error!("load_unit cancelled: unit {load} cannot be loaded onto itself");
            return false;
        }
        if let Some(transport) = unit.loaded_onto {
            log::warn!("load_unit: unit {load} is already loaded onto unit {transport}");
            return false;
        }
        if self.outermost_transport(onto) == Some(load) {
            log::error!("load_unit cancelled: unit {onto} is carried by unit {load}");
            return false;
        }
        self.cancel_capture(Some(load));
        let position = self.units.get(&load).and_then(Unit::position);
        if let Some(tile) = position.and_then(|pos| self.tile_mut(pos)) {
            if tile.unit == Some(load) {
                tile.unit = None;
            }
        }
        if let Some(unit) = self.units.get_mut(&load) {
            unit.position = None;
            unit.loaded_onto = Some(onto);
        }
        if let Some(transport) = self.units.get_mut(&onto) {
            transport.cargo.insert(load);
        }
        true
    }

    /// Unload `unload` from the transport `from` onto the vacant tile `pos`.
    pub fn unload_unit(&mut self, unload: UnitId, from: UnitId, pos: Coord) -> bool {
        if !self.units.contains_key(&from) {
            log::error!("unload_unit cancelled: transport unit {from} does not exist");
            return false;
        }
        if !self.units.contains_key(&unload) {
            log::error!("unload_unit cancelled: unit {unload} does not exist");
            return false;
        }
        if !self.in_bounds(pos) {
            log::error!(
                "unload_unit cancelled: {pos} is out of bounds of the {}x{} map",
                self.width,
                self.height
            );
            return false;
        }
        if let Some(occupant) = self.occupant(pos) {
            log::error!("unload_unit cancelled: {pos} is occupied by unit {occupant}");
            return false;
        }
        let unloaded = self
            .units
            .get_mut(&from)
            .is_some_and(|transport| transport.cargo.remove(&unload));
        if !unloaded {
            log::error!("unload_unit failed: unit {unload} is not loaded onto unit {from}");
            return false;
        }
        if let Some(unit) = self.units.get_mut(&unload) {
            unit.loaded_onto = None;
        }
        self.set_unit_position(unload, pos)
    }

    /// Units loaded directly onto `id`.
    #[must_use]
    pub fn loaded_units(&self, id: UnitId) -> BTreeSet<UnitId> {
        self.unit_or_log("loaded_units", id)
            .map(|unit| unit.cargo.clone())
            .unwrap_or_default()
    }

    /// The transport `id` is loaded onto.
    #[must_use]
    pub fn unit_loaded_onto(&self, id: UnitId) -> Option<UnitId> {
        self.unit_or_log("unit_loaded_onto", id)
            .and_then(Unit::loaded_onto)
    }

    /// The unloaded unit that ultimately carries `id`, or `id` itself if it
    /// is not loaded.
    #[must_use]
    pub fn outermost_transport(&self, id: UnitId) -> Option<UnitId> {
        let mut current = id;
        let mut unit = self.unit_or_log("outermost_transport", id)?;
        // A chain can never be longer than the number of units.
        for _ in 0..self.units.len() {
            let Some(next) = unit.loaded_onto else {
                return Some(current);
            };
            current = next;
            unit = self.units.get(&current)?;
        }
        log::error!("outermost_transport failed: unit {id} is part of a transport cycle");
        None
    }

    /// Check if `unit` is loaded directly onto `on`.
    #[must_use]
    pub fn is_unit_loaded_onto_unit(&self, unit: UnitId, on: UnitId) -> bool {
        if self.unit_or_log("is_unit_loaded_onto_unit", unit).is_none() {
            return false;
        }
        self.unit_or_log("is_unit_loaded_onto_unit", on)
            .is_some_and(|transport| transport.cargo.contains(&unit))
    }

    /// Stop a capturing unit's capture, restoring the tile's HP.
    pub(super) fn cancel_capture(&mut self, id: Option<UnitId>) {
        let Some(id) = id else {
            return;
        };
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        if !unit.capturing {
            return;
        }
        unit.capturing = false;
        let Some(pos) = unit.position else {
            return;
        };
        let max_hp = self.tile(pos).and_then(|tile| tile.tile_type).and_then(|t| {
            self.banks
                .terrain_of(t)
                .map(|terrain| i32::try_from(terrain.max_hp).unwrap_or(i32::MAX))
        });
        if let (Some(max_hp), Some(tile)) = (max_hp, self.tile_mut(pos)) {
            tile.set_hp(max_hp);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game::test_support::{sample_map, APC, CITY, INFANTRY, ORANGE};
    use crate::game::{Coord, UnitId};

    fn id(raw: u32) -> UnitId {
        UnitId::new(raw).unwrap()
    }

    #[test]
    fn test_create_unit_requires_army_and_type() {
        let mut map = sample_map(2, 2);
        assert_eq!(map.create_unit(INFANTRY, ORANGE), None);
        map.create_army(ORANGE);
        assert_eq!(map.create_unit(77, ORANGE), None);
        let unit = map.create_unit_by_name("infantry", ORANGE).unwrap();
        assert_eq!(unit, id(1));
        assert!(map.units_of_army(ORANGE).contains(&unit));
        assert!(!map.is_unit_on_map(unit));
        assert_eq!(map.unit_hp(unit), 0);
    }

    #[test]
    fn test_occupancy_scenario() {
        let mut map = sample_map(2, 2);
        assert!(map.create_army(ORANGE));
        let first = map.create_unit(INFANTRY, ORANGE).unwrap();
        assert_eq!(first, id(1));
        assert!(map.set_unit_position(first, Coord::new(0, 0)));
        assert_eq!(map.unit_on_tile(Coord::new(0, 0)), Some(first));

        let second = map.create_unit(INFANTRY, ORANGE).unwrap();
        assert_eq!(second, id(2));
        assert!(!map.set_unit_position(second, Coord::new(0, 0)));
        assert_eq!(map.unit_on_tile(Coord::new(0, 0)), Some(first));
        assert_eq!(map.unit_position(second), None);
    }

    #[test]
    fn test_move_vacates_old_tile() {
        let mut map = sample_map(3, 1);
        map.create_army(ORANGE);
        let unit = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(unit, Coord::new(0, 0));
        assert!(map.set_unit_position(unit, Coord::new(2, 0)));
        assert_eq!(map.unit_on_tile(Coord::new(0, 0)), None);
        assert_eq!(map.unit_on_tile(Coord::new(2, 0)), Some(unit));
        assert!(map.set_unit_position(unit, Coord::new(2, 0)));
        assert!(!map.set_unit_position(unit, Coord::new(3, 0)));
        assert_eq!(map.unit_position(unit), Some(Coord::new(2, 0)));
    }

    #[test]
    fn test_delete_transport_deletes_cargo() {
        let mut map = sample_map(2, 2);
        map.create_army(ORANGE);
        let transport = map.create_unit(APC, ORANGE).unwrap();
        let passenger = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(transport, Coord::new(1, 1));
        assert!(map.load_unit(passenger, transport));
        assert!(map.delete_unit(transport));
        assert!(map.unit(transport).is_none());
        assert!(map.unit(passenger).is_none());
        assert!(map.units_of_army(ORANGE).is_empty());
        assert_eq!(map.unit_on_tile(Coord::new(1, 1)), None);
    }

    #[test]
    fn test_delete_cargo_leaves_transport() {
        let mut map = sample_map(2, 2);
        map.create_army(ORANGE);
        let transport = map.create_unit(APC, ORANGE).unwrap();
        let passenger = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.load_unit(passenger, transport);
        assert!(map.delete_unit(passenger));
        assert!(map.loaded_units(transport).is_empty());
        assert!(!map.delete_unit(passenger));
    }

    #[test]
    fn test_load_and_unload() {
        let mut map = sample_map(3, 3);
        map.create_army(ORANGE);
        let transport = map.create_unit(APC, ORANGE).unwrap();
        let passenger = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(transport, Coord::new(0, 0));
        map.set_unit_position(passenger, Coord::new(1, 0));

        assert!(!map.load_unit(passenger, passenger));
        assert!(map.load_unit(passenger, transport));
        assert_eq!(map.unit_on_tile(Coord::new(1, 0)), None);
        assert_eq!(map.unit_position(passenger), None);
        assert_eq!(map.unit_loaded_onto(passenger), Some(transport));
        assert!(map.is_unit_loaded_onto_unit(passenger, transport));
        assert!(!map.load_unit(passenger, transport));
        assert!(!map.set_unit_position(passenger, Coord::new(2, 2)));

        assert!(!map.unload_unit(passenger, transport, Coord::new(0, 0)));
        assert!(!map.unload_unit(passenger, transport, Coord::new(9, 9)));
        assert!(!map.unload_unit(transport, passenger, Coord::new(2, 2)));
        assert!(map.unload_unit(passenger, transport, Coord::new(2, 2)));
        assert_eq!(map.unit_position(passenger), Some(Coord::new(2, 2)));
        assert_eq!(map.unit_loaded_onto(passenger), None);
        assert!(map.loaded_units(transport).is_empty());
    }

    #[test]
    fn test_transport_cycle_rejected() {
        let mut map = sample_map(1, 1);
        map.create_army(ORANGE);
        let outer = map.create_unit(APC, ORANGE).unwrap();
        let inner = map.create_unit(APC, ORANGE).unwrap();
        assert!(map.load_unit(inner, outer));
        assert!(!map.load_unit(outer, inner));
        assert_eq!(map.outermost_transport(inner), Some(outer));
        assert_eq!(map.outermost_transport(outer), Some(outer));
    }

    #[test]
    fn test_stats_clamped() {
        let mut map = sample_map(1, 1);
        map.create_army(ORANGE);
        let unit = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_hp(unit, -1);
        map.set_unit_fuel(unit, 10);
        map.burn_unit_fuel(unit, 25);
        map.set_unit_ammo(unit, -3);
        assert_eq!(map.unit_hp(unit), 0);
        assert_eq!(map.unit_fuel(unit), 0);
        assert_eq!(map.unit_ammo(unit), 0);
    }

    #[test]
    fn test_replenish() {
        let mut map = sample_map(1, 1);
        map.create_army(ORANGE);
        let infantry = map.create_unit(INFANTRY, ORANGE).unwrap();
        assert!(!map.is_unit_replenished(infantry, false));
        assert!(map.replenish_unit(infantry, false));
        assert_eq!(map.unit_fuel(infantry), 99);
        assert!(map.is_unit_replenished(infantry, false));
        assert!(!map.is_unit_replenished(infantry, true));
        map.replenish_unit(infantry, true);
        assert_eq!(map.unit_hp(infantry), 100);

        // APCs have infinite ammo.
        let apc = map.create_unit(APC, ORANGE).unwrap();
        map.set_unit_fuel(apc, 70);
        assert!(map.is_unit_replenished(apc, false));
        map.replenish_unit(apc, false);
        assert_eq!(map.unit_ammo(apc), 0);
    }

    #[test]
    fn test_flags() {
        let mut map = sample_map(1, 1);
        map.create_army(ORANGE);
        let unit = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.wait_unit(unit, true);
        map.unit_hiding(unit, true);
        assert!(map.is_unit_waiting(unit));
        assert!(map.is_unit_hiding(unit));
        assert!(!map.is_unit_capturing(unit));
        let missing = UnitId::new(50).unwrap();
        assert!(!map.wait_unit(missing, true));
        assert!(!map.is_unit_waiting(missing));
    }

    #[test]
    fn test_capture_cancelled_on_move() {
        let mut map = sample_map(2, 1);
        map.create_army(ORANGE);
        map.set_tile_type(Coord::new(0, 0), CITY);
        map.set_tile_hp(Coord::new(0, 0), 8);
        let unit = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(unit, Coord::new(0, 0));
        map.unit_capturing(unit, true);

        assert!(map.set_unit_position(unit, Coord::new(1, 0)));
        assert!(!map.is_unit_capturing(unit));
        assert_eq!(map.tile_hp(Coord::new(0, 0)), 20);
    }

    #[test]
    fn test_capture_cancelled_on_delete() {
        let mut map = sample_map(1, 1);
        map.create_army(ORANGE);
        map.set_tile_type(Coord::new(0, 0), CITY);
        map.set_tile_hp(Coord::new(0, 0), 3);
        let unit = map.create_unit(INFANTRY, ORANGE).unwrap();
        map.set_unit_position(unit, Coord::new(0, 0));
        map.unit_capturing(unit, true);
        map.delete_unit(unit);
        assert_eq!(map.tile_hp(Coord::new(0, 0)), 20);
    }
}
