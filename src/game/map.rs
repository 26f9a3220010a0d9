//! The map aggregate: grid, armies, units and selection.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::path::PathBuf;
use std::sync::Arc;

use crate::bank::{BankId, Banks};
use crate::game::{Army, ArmyId, Coord, Direction, Tile, Unit, UnitId, UnitIdAllocator};

/// The complete state of one battle.
///
/// Every mutation goes through a `Map` method, which checks its inputs, logs
/// and refuses bad calls, and keeps tiles, armies and units consistent with
/// one another. See [`crate::game::check_invariants`] for what "consistent"
/// means.
#[derive(Debug, Clone)]
pub struct Map {
    pub(super) banks: Arc<Banks>,
    /// Stored as raw bytes; files carry no text encoding.
    pub(super) name: Vec<u8>,
    pub(super) width: u32,
    pub(super) height: u32,
    /// Tiles stored in row-major order.
    pub(super) tiles: Vec<Tile>,
    pub(super) armies: BTreeMap<ArmyId, Army>,
    pub(super) units: BTreeMap<UnitId, Unit>,
    pub(super) unit_ids: UnitIdAllocator,
    pub(super) selected_tile: Coord,
    pub(super) selected_army: Option<ArmyId>,
    pub(super) filename: Option<PathBuf>,
}

impl Map {
    /// Create an empty 0x0 map using the given content.
    #[must_use]
    pub fn new(banks: Arc<Banks>) -> Self {
        Self {
            banks,
            name: Vec::new(),
            width: 0,
            height: 0,
            tiles: Vec::new(),
            armies: BTreeMap::new(),
            units: BTreeMap::new(),
            unit_ids: UnitIdAllocator::default(),
            selected_tile: Coord::default(),
            selected_army: None,
            filename: None,
        }
    }

    /// Content the map refers to.
    #[must_use]
    pub fn banks(&self) -> &Banks {
        &self.banks
    }

    /// Map name for display, with invalid UTF-8 replaced.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Map name exactly as stored.
    #[must_use]
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    /// Rename the map.
    pub fn set_name(&mut self, name: impl Into<Vec<u8>>) {
        self.name = name.into();
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, pos: Coord) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(y * width + x)
    }

    /// The tile at `pos`.
    #[must_use]
    pub fn tile(&self, pos: Coord) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.tiles.get(idx))
    }

    pub(super) fn tile_mut(&mut self, pos: Coord) -> Option<&mut Tile> {
        self.index(pos).and_then(|idx| self.tiles.get_mut(idx))
    }

    /// Iterate over every coordinate and tile, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
            .zip(self.tiles.iter())
    }

    fn check_bounds(&self, op: &str, pos: Coord) -> bool {
        let in_bounds = self.in_bounds(pos);
        if !in_bounds {
            log::error!(
                "{op} cancelled: {pos} is out of bounds of the {}x{} map",
                self.width,
                self.height
            );
        }
        in_bounds
    }

    /// Resize the map.
    ///
    /// Tiles that stay in bounds keep their state; new tiles get `fill` as
    /// their type. When shrinking, armies lose the tiles that disappear, units
    /// standing on them are deleted along with their cargo, and the selected
    /// tile is pulled back into bounds.
    pub fn set_map_size(&mut self, width: u32, height: u32, fill: Option<BankId>) -> bool {
        if let Some(fill) = fill {
            if !self.banks.tile_types().contains(fill) {
                log::error!("set_map_size cancelled: tile type {fill} does not exist");
                return false;
            }
        }
        let Some(count) = tile_count(width, height) else {
            log::error!("set_map_size cancelled: a {width}x{height} map is too large");
            return false;
        };

        let mut old = std::mem::take(&mut self.tiles);
        let (old_width, old_height) = (self.width, self.height);
        let mut tiles = vec![Tile::new(fill); count];
        for y in 0..height.min(old_height) {
            for x in 0..width.min(old_width) {
                let (Some(from), Some(to)) = (
                    tile_index(old_width, x, y),
                    tile_index(width, x, y),
                ) else {
                    continue;
                };
                if let (Some(old_tile), Some(new_tile)) = (old.get_mut(from), tiles.get_mut(to)) {
                    *new_tile = std::mem::take(old_tile);
                }
            }
        }
        self.tiles = tiles;
        self.width = width;
        self.height = height;

        for army in self.armies.values_mut() {
            army.tiles.retain(|&pos| pos.x < width && pos.y < height);
        }
        let stranded: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, unit)| unit.position.is_some_and(|pos| !self.in_bounds(pos)))
            .map(|(&id, _)| id)
            .collect();
        for id in stranded {
            if self.units.contains_key(&id) {
                self.delete_unit(id);
            }
        }
        self.selected_tile = Coord::new(
            self.selected_tile.x.min(width.saturating_sub(1)),
            self.selected_tile.y.min(height.saturating_sub(1)),
        );
        true
    }

    /// Change a tile's type. The tile keeps its HP but loses its owner.
    pub fn set_tile_type(&mut self, pos: Coord, tile_type: BankId) -> bool {
        if !self.check_bounds("set_tile_type", pos) {
            return false;
        }
        if !self.banks.tile_types().contains(tile_type) {
            log::error!("set_tile_type cancelled: tile type {tile_type} does not exist");
            return false;
        }
        self.cancel_capture(self.occupant(pos));
        if let Some(tile) = self.tile_mut(pos) {
            tile.tile_type = Some(tile_type);
        }
        self.set_tile_owner(pos, None)
    }

    /// [`Map::set_tile_type`] by tile type script name.
    pub fn set_tile_type_by_name(&mut self, pos: Coord, tile_type: &str) -> bool {
        if let Some(entry) = self.banks.tile_types().get_by_name(tile_type) {
            self.set_tile_type(pos, entry.id())
        } else {
            log::error!("set_tile_type cancelled: no tile type named \"{tile_type}\"");
            false
        }
    }

    /// A tile's type.
    #[must_use]
    pub fn tile_type(&self, pos: Coord) -> Option<BankId> {
        if !self.check_bounds("tile_type", pos) {
            return None;
        }
        self.tile(pos).and_then(Tile::tile_type)
    }

    /// Set a tile's HP. Negative values are stored as 0.
    pub fn set_tile_hp(&mut self, pos: Coord, hp: i32) -> bool {
        if !self.check_bounds("set_tile_hp", pos) {
            return false;
        }
        if let Some(tile) = self.tile_mut(pos) {
            tile.set_hp(hp);
        }
        true
    }

    /// A tile's HP, or 0 if it is out of bounds.
    #[must_use]
    pub fn tile_hp(&self, pos: Coord) -> i32 {
        if !self.check_bounds("tile_hp", pos) {
            return 0;
        }
        self.tile(pos).map_or(0, Tile::hp)
    }

    /// Give a tile to an army, or make it neutral with `None`.
    pub fn set_tile_owner(&mut self, pos: Coord, owner: Option<ArmyId>) -> bool {
        if !self.check_bounds("set_tile_owner", pos) {
            return false;
        }
        if let Some(army) = owner {
            if !self.armies.contains_key(&army) {
                log::error!(
                    "set_tile_owner cancelled: cannot give tile {pos} to army {army}, which \
                     does not exist"
                );
                return false;
            }
        }
        let previous = self.tile(pos).and_then(Tile::owner);
        if previous == owner {
            return true;
        }
        self.cancel_capture(self.occupant(pos));
        if let Some(army) = previous.and_then(|old| self.armies.get_mut(&old)) {
            army.tiles.remove(&pos);
        }
        if let Some(army) = owner.and_then(|new| self.armies.get_mut(&new)) {
            army.tiles.insert(pos);
        }
        if let Some(tile) = self.tile_mut(pos) {
            tile.owner = owner;
        }
        true
    }

    /// A tile's owner.
    #[must_use]
    pub fn tile_owner(&self, pos: Coord) -> Option<ArmyId> {
        if !self.check_bounds("tile_owner", pos) {
            return None;
        }
        self.tile(pos).and_then(Tile::owner)
    }

    /// The unit standing on a tile.
    #[must_use]
    pub fn unit_on_tile(&self, pos: Coord) -> Option<UnitId> {
        if !self.check_bounds("unit_on_tile", pos) {
            return None;
        }
        self.occupant(pos)
    }

    /// The tile's recorded unit, if that unit really stands there.
    pub(super) fn occupant(&self, pos: Coord) -> Option<UnitId> {
        let id = self.tile(pos)?.unit?;
        let unit = self.units.get(&id)?;
        (unit.position == Some(pos)).then_some(id)
    }

    fn check_fill(&self, op: &str, tile_type: BankId, owner: Option<ArmyId>) -> bool {
        if !self.banks.tile_types().contains(tile_type) {
            log::error!("{op} cancelled: tile type {tile_type} does not exist");
            return false;
        }
        if let Some(army) = owner {
            if !self.armies.contains_key(&army) {
                log::error!("{op} cancelled: army {army} does not exist");
                return false;
            }
        }
        true
    }

    /// Set every tile's type and owner.
    pub fn fill_map(&mut self, tile_type: BankId, owner: Option<ArmyId>) -> bool {
        if !self.check_fill("fill_map", tile_type, owner) {
            return false;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Coord::new(x, y);
                self.set_tile_type(pos, tile_type);
                self.set_tile_owner(pos, owner);
            }
        }
        true
    }

    /// Set the type and owner of every tile in the rectangle with corners
    /// `start` and `end`, inclusive.
    pub fn rectangle_fill_tiles(
        &mut self,
        start: Coord,
        end: Coord,
        tile_type: BankId,
        owner: Option<ArmyId>,
    ) -> bool {
        if !self.check_bounds("rectangle_fill_tiles", start)
            || !self.check_bounds("rectangle_fill_tiles", end)
            || !self.check_fill("rectangle_fill_tiles", tile_type, owner)
        {
            return false;
        }
        for pos in rectangle(start, end) {
            self.set_tile_type(pos, tile_type);
            self.set_tile_owner(pos, owner);
        }
        true
    }

    /// Delete every unit standing in the rectangle with corners `start` and
    /// `end`, inclusive, along with their cargo.
    ///
    /// Returns how many units were standing there.
    pub fn rectangle_delete_units(&mut self, start: Coord, end: Coord) -> usize {
        if !self.check_bounds("rectangle_delete_units", start)
            || !self.check_bounds("rectangle_delete_units", end)
        {
            return 0;
        }
        let mut deleted = 0;
        for pos in rectangle(start, end) {
            if let Some(id) = self.occupant(pos) {
                if self.delete_unit(id) {
                    deleted += 1;
                }
            }
        }
        deleted
    }

    /// Move the cursor. Out-of-bounds positions are ignored.
    pub fn set_selected_tile(&mut self, pos: Coord) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.selected_tile = pos;
        true
    }

    /// The cursor position.
    #[must_use]
    pub const fn selected_tile(&self) -> Coord {
        self.selected_tile
    }

    /// Move the cursor one tile, if that stays in bounds.
    pub fn move_selected_tile(&mut self, direction: Direction) -> bool {
        self.selected_tile
            .step(direction)
            .is_some_and(|pos| self.set_selected_tile(pos))
    }

    /// Select an army, or clear the selection with `None`.
    pub fn set_selected_army(&mut self, army: Option<ArmyId>) -> bool {
        if let Some(id) = army {
            if !self.armies.contains_key(&id) {
                log::error!("set_selected_army cancelled: army {id} does not exist");
                return false;
            }
        }
        self.selected_army = army;
        true
    }

    /// The selected army.
    #[must_use]
    pub const fn selected_army(&self) -> Option<ArmyId> {
        self.selected_army
    }

    /// The army whose turn follows the selected army's, wrapping around to
    /// the first.
    #[must_use]
    pub fn next_army(&self) -> Option<ArmyId> {
        let Some(current) = self.selected_army else {
            return self.first_army();
        };
        self.armies
            .range((Bound::Excluded(current), Bound::Unbounded))
            .next()
            .map(|(&id, _)| id)
            .or_else(|| self.first_army())
    }

    /// The army that moves first.
    #[must_use]
    pub fn first_army(&self) -> Option<ArmyId> {
        self.armies.keys().next().copied()
    }

    /// Every tile owned by an army, as a set. Used by the invariant checker.
    pub(super) fn owned_tiles(&self) -> BTreeSet<(ArmyId, Coord)> {
        self.tiles()
            .filter_map(|(pos, tile)| tile.owner.map(|army| (army, pos)))
            .collect()
    }
}

/// Number of tiles on a `width` x `height` map, if it fits in memory indexing.
pub(super) fn tile_count(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)
}

fn tile_index(width: u32, x: u32, y: u32) -> Option<usize> {
    let row = usize::try_from(y).ok()?.checked_mul(usize::try_from(width).ok()?)?;
    row.checked_add(usize::try_from(x).ok()?)
}

/// Coordinates of a rectangle, column by column.
fn rectangle(start: Coord, end: Coord) -> impl Iterator<Item = Coord> {
    let (x0, x1) = (start.x.min(end.x), start.x.max(end.x));
    let (y0, y1) = (start.y.min(end.y), start.y.max(end.y));
    (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| Coord::new(x, y)))
}
