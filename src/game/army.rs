//! Armies and the map operations that manage them.

use std::collections::BTreeSet;

use crate::bank::BankId;
use crate::game::{Coord, Map, UnitId};

/// Identifier of an army: the ID of the country it plays as.
pub type ArmyId = BankId;

/// One player's state on a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Army {
    country: ArmyId,
    funds: i32,
    pub(super) units: BTreeSet<UnitId>,
    pub(super) tiles: BTreeSet<Coord>,
    current_co: Option<BankId>,
    tag_co: Option<BankId>,
}

impl Army {
    pub(super) const fn new(country: ArmyId) -> Self {
        Self {
            country,
            funds: 0,
            units: BTreeSet::new(),
            tiles: BTreeSet::new(),
            current_co: None,
            tag_co: None,
        }
    }

    /// Country ID, which is also the army's ID.
    #[must_use]
    pub const fn country(&self) -> ArmyId {
        self.country
    }

    /// Funds, never negative.
    #[must_use]
    pub const fn funds(&self) -> i32 {
        self.funds
    }

    /// Units owned by the army.
    #[must_use]
    pub const fn units(&self) -> &BTreeSet<UnitId> {
        &self.units
    }

    /// Tiles owned by the army.
    #[must_use]
    pub const fn tiles(&self) -> &BTreeSet<Coord> {
        &self.tiles
    }

    /// Current commander.
    #[must_use]
    pub const fn current_co(&self) -> Option<BankId> {
        self.current_co
    }

    /// Tag commander.
    #[must_use]
    pub const fn tag_co(&self) -> Option<BankId> {
        self.tag_co
    }

    pub(super) fn set_funds(&mut self, funds: i32) {
        self.funds = funds.max(0);
    }

    /// Callers guarantee `current` is set whenever `tag` is.
    pub(super) fn set_cos(&mut self, current: Option<BankId>, tag: Option<BankId>) {
        self.current_co = current;
        self.tag_co = tag;
    }

    pub(super) fn swap_cos(&mut self) {
        std::mem::swap(&mut self.current_co, &mut self.tag_co);
    }
}

impl Map {
    /// Add an army playing as `country`.
    ///
    /// Fails if the country does not exist or already has an army here.
    pub fn create_army(&mut self, country: BankId) -> bool {
        if !self.banks.countries().contains(country) {
            log::error!("create_army cancelled: country {country} does not exist");
            return false;
        }
        if self.armies.contains_key(&country) {
            log::error!("create_army cancelled: army {country} already exists");
            return false;
        }
        self.armies.insert(country, Army::new(country));
        true
    }

    /// [`Map::create_army`] by country script name.
    pub fn create_army_by_name(&mut self, country: &str) -> bool {
        match self.banks.countries().get_by_name(country) {
            Some(entry) => self.create_army(entry.id()),
            None => {
                log::error!("create_army cancelled: no country named \"{country}\"");
                false
            }
        }
    }

    /// Remove an army, deleting its units and disowning its tiles.
    pub fn delete_army(&mut self, army: ArmyId) -> bool {
        let Some(existing) = self.armies.get(&army) else {
            log::error!("delete_army cancelled: army {army} does not exist");
            return false;
        };
        let units: Vec<UnitId> = existing.units.iter().copied().collect();
        let tiles: Vec<Coord> = existing.tiles.iter().copied().collect();
        for unit in units {
            // Cargo goes with its transport, so it may already be gone.
            if self.units.contains_key(&unit) {
                self.delete_unit(unit);
            }
        }
        for tile in tiles {
            self.set_tile_owner(tile, None);
        }
        self.armies.remove(&army);
        if self.selected_army == Some(army) {
            self.selected_army = None;
        }
        true
    }

    /// Look an army up.
    #[must_use]
    pub fn army(&self, army: ArmyId) -> Option<&Army> {
        self.armies.get(&army)
    }

    /// Every army, in turn order.
    pub fn armies(&self) -> impl Iterator<Item = &Army> {
        self.armies.values()
    }

    /// Number of armies.
    #[must_use]
    pub fn army_count(&self) -> usize {
        self.armies.len()
    }

    /// IDs of every army, in turn order.
    #[must_use]
    pub fn army_ids(&self) -> Vec<ArmyId> {
        self.armies.keys().copied().collect()
    }

    fn army_or_log(&self, op: &str, army: ArmyId) -> Option<&Army> {
        let found = self.armies.get(&army);
        if found.is_none() {
            log::error!("{op} failed: army {army} does not exist");
        }
        found
    }

    fn army_mut_or_log(&mut self, op: &str, army: ArmyId) -> Option<&mut Army> {
        let found = self.armies.get_mut(&army);
        if found.is_none() {
            log::error!("{op} cancelled: army {army} does not exist");
        }
        found
    }

    /// Set an army's funds. Negative amounts are stored as 0.
    pub fn set_army_funds(&mut self, army: ArmyId, funds: i32) -> bool {
        let Some(entry) = self.army_mut_or_log("set_army_funds", army) else {
            return false;
        };
        entry.set_funds(funds);
        true
    }

    /// Add `delta` (possibly negative) to an army's funds.
    pub fn offset_army_funds(&mut self, army: ArmyId, delta: i32) -> bool {
        let Some(entry) = self.army_mut_or_log("offset_army_funds", army) else {
            return false;
        };
        entry.set_funds(entry.funds().saturating_add(delta));
        true
    }

    /// An army's funds, or 0 if it does not exist.
    #[must_use]
    pub fn army_funds(&self, army: ArmyId) -> i32 {
        self.army_or_log("army_funds", army).map_or(0, Army::funds)
    }

    /// Assign both commanders of an army.
    ///
    /// At least one must be given. A tag commander without a current one is
    /// promoted to current.
    pub fn set_army_cos(
        &mut self,
        army: ArmyId,
        current: Option<BankId>,
        tag: Option<BankId>,
    ) -> bool {
        if current.is_none() && tag.is_none() {
            log::error!("set_army_cos cancelled: no commander given for army {army}");
            return false;
        }
        if let Some(missing) = [current, tag]
            .into_iter()
            .flatten()
            .find(|&co| !self.banks.commanders().contains(co))
        {
            log::error!("set_army_cos cancelled: commander {missing} does not exist");
            return false;
        }
        let Some(entry) = self.army_mut_or_log("set_army_cos", army) else {
            return false;
        };
        match (current, tag) {
            (None, Some(tag)) => {
                log::warn!(
                    "set_army_cos: army {army} given tag commander {tag} without a current \
                     commander; making it the current commander"
                );
                entry.set_cos(Some(tag), None);
            }
            (current, tag) => entry.set_cos(current, tag),
        }
        true
    }

    /// Replace an army's current commander, keeping its tag commander.
    pub fn set_army_current_co(&mut self, army: ArmyId, current: Option<BankId>) -> bool {
        let Some(tag) = self.army_or_log("set_army_current_co", army).map(Army::tag_co) else {
            return false;
        };
        self.set_army_cos(army, current, tag)
    }

    /// Replace an army's tag commander, keeping its current commander.
    pub fn set_army_tag_co(&mut self, army: ArmyId, tag: Option<BankId>) -> bool {
        let Some(current) = self.army_or_log("set_army_tag_co", army).map(Army::current_co)
        else {
            return false;
        };
        self.set_army_cos(army, current, tag)
    }

    /// Swap an army's current and tag commanders.
    pub fn tag_army_cos(&mut self, army: ArmyId) -> bool {
        let Some(entry) = self.army_mut_or_log("tag_army_cos", army) else {
            return false;
        };
        if entry.tag_co().is_none() {
            log::error!("tag_army_cos cancelled: army {army} has no tag commander");
            return false;
        }
        entry.swap_cos();
        true
    }

    /// An army's current commander.
    #[must_use]
    pub fn army_current_co(&self, army: ArmyId) -> Option<BankId> {
        self.army_or_log("army_current_co", army)
            .and_then(Army::current_co)
    }

    /// An army's tag commander.
    #[must_use]
    pub fn army_tag_co(&self, army: ArmyId) -> Option<BankId> {
        self.army_or_log("army_tag_co", army).and_then(Army::tag_co)
    }

    /// Check if an army has a tag commander.
    #[must_use]
    pub fn tag_co_is_present(&self, army: ArmyId) -> bool {
        self.army_tag_co(army).is_some()
    }

    /// Tiles owned by an army; empty if it does not exist.
    #[must_use]
    pub fn tiles_of_army(&self, army: ArmyId) -> BTreeSet<Coord> {
        self.army_or_log("tiles_of_army", army)
            .map(|a| a.tiles.clone())
            .unwrap_or_default()
    }

    /// Units owned by an army; empty if it does not exist.
    #[must_use]
    pub fn units_of_army(&self, army: ArmyId) -> BTreeSet<UnitId> {
        self.army_or_log("units_of_army", army)
            .map(|a| a.units.clone())
            .unwrap_or_default()
    }
}
