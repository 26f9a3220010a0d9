//! Saving and loading maps as CWM files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::bank::Banks;
use crate::cwm::{self, ArmyRecord, MapRecord, TileRecord, UnitRecord};
use crate::error::{CodecError, CodecResult};
use crate::game::{assert_invariants, Coord, Map, UnitId};

impl Map {
    /// Snapshot the map as a CWM record.
    ///
    /// Only units on the grid, and the cargo they carry, are included: a unit
    /// that was created but never placed has nowhere to be stored.
    #[must_use]
    pub fn to_record(&self) -> MapRecord {
        let armies = self
            .armies
            .values()
            .map(|army| ArmyRecord {
                country: army.country(),
                funds: army.funds(),
                current_co: army.current_co(),
                tag_co: army.tag_co(),
            })
            .collect();
        let tiles = self
            .tiles()
            .map(|(pos, tile)| TileRecord {
                tile_type: tile.tile_type(),
                hp: tile.hp(),
                owner: tile.owner(),
                unit: self.occupant(pos).and_then(|id| self.unit_record(id)),
            })
            .collect();
        MapRecord {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            selected: Some((self.selected_tile.x, self.selected_tile.y)),
            armies,
            tiles,
        }
    }

    fn unit_record(&self, id: UnitId) -> Option<UnitRecord> {
        let unit = self.units.get(&id)?;
        Some(UnitRecord {
            army: unit.army(),
            unit_type: unit.unit_type(),
            hp: unit.hp(),
            fuel: unit.fuel(),
            ammo: unit.ammo(),
            cargo: unit
                .cargo()
                .iter()
                .filter_map(|&loaded| self.unit_record(loaded))
                .collect(),
        })
    }

    /// Build a map from a decoded record, checking every stored ID against
    /// `banks` and every value against the map's own rules.
    fn from_record(banks: Arc<Banks>, record: &MapRecord) -> CodecResult<Self> {
        let mut map = Self::new(banks);
        map.set_name(record.name.clone());
        if !map.set_map_size(record.width, record.height, None) {
            return Err(CodecError::SizeOverflow {
                width: record.width,
                height: record.height,
            });
        }
        if let Some((x, y)) = record.selected {
            // An empty map still stores a (0, 0) cursor.
            if !map.set_selected_tile(Coord::new(x, y)) && (x, y) != (0, 0) {
                log::warn!("stored cursor ({x}, {y}) is out of bounds, ignoring it");
            }
        }
        for army in &record.armies {
            map.apply_army(army)?;
        }
        if record.tiles.len() != map.tiles.len() {
            return Err(CodecError::Rejected(format!(
                "{} tiles stored for a {}x{} map",
                record.tiles.len(),
                record.width,
                record.height
            )));
        }
        let coords: Vec<Coord> = map.tiles().map(|(pos, _)| pos).collect();
        for (pos, tile) in coords.into_iter().zip(&record.tiles) {
            map.apply_tile(pos, tile)?;
        }
        Ok(map)
    }

    fn apply_army(&mut self, army: &ArmyRecord) -> CodecResult<()> {
        let country = army.country;
        if !self.banks.countries().contains(country) {
            return Err(CodecError::UnknownEntry {
                bank: "country",
                id: country,
            });
        }
        if !self.create_army(country) {
            return Err(CodecError::Rejected(format!("army {country} is stored twice")));
        }
        self.set_army_funds(country, army.funds);
        if let Some(missing) = [army.current_co, army.tag_co]
            .into_iter()
            .flatten()
            .find(|&co| !self.banks.commanders().contains(co))
        {
            return Err(CodecError::UnknownEntry {
                bank: "commander",
                id: missing,
            });
        }
        if army.current_co.is_some() || army.tag_co.is_some() {
            self.set_army_cos(country, army.current_co, army.tag_co);
        }
        Ok(())
    }

    fn apply_tile(&mut self, pos: Coord, tile: &TileRecord) -> CodecResult<()> {
        if let Some(tile_type) = tile.tile_type {
            if !self.set_tile_type(pos, tile_type) {
                return Err(CodecError::UnknownEntry {
                    bank: "tile type",
                    id: tile_type,
                });
            }
        }
        self.set_tile_hp(pos, tile.hp);
        if let Some(owner) = tile.owner {
            if !self.set_tile_owner(pos, Some(owner)) {
                return Err(CodecError::Rejected(format!(
                    "tile {pos} is owned by army {owner}, which is not stored"
                )));
            }
        }
        if let Some(unit) = &tile.unit {
            self.apply_unit(pos, unit, None)?;
        }
        Ok(())
    }

    fn apply_unit(
        &mut self,
        pos: Coord,
        unit: &UnitRecord,
        onto: Option<UnitId>,
    ) -> CodecResult<()> {
        if !self.banks.unit_types().contains(unit.unit_type) {
            return Err(CodecError::UnknownEntry {
                bank: "unit type",
                id: unit.unit_type,
            });
        }
        if !self.armies.contains_key(&unit.army) {
            return Err(CodecError::Rejected(format!(
                "unit on tile {pos} belongs to army {}, which is not stored",
                unit.army
            )));
        }
        let id = self
            .create_unit(unit.unit_type, unit.army)
            .ok_or_else(|| CodecError::Rejected("no unit IDs left".to_string()))?;
        self.set_unit_hp(id, unit.hp);
        self.set_unit_fuel(id, unit.fuel);
        self.set_unit_ammo(id, unit.ammo);
        let placed = match onto {
            Some(transport) => self.load_unit(id, transport),
            None => self.set_unit_position(id, pos),
        };
        if !placed {
            return Err(CodecError::Rejected(format!(
                "unit on tile {pos} could not be placed"
            )));
        }
        for loaded in &unit.cargo {
            self.apply_unit(pos, loaded, Some(id))?;
        }
        Ok(())
    }

    /// Replace this map with one decoded from CWM bytes.
    ///
    /// The map is only changed if the whole file is valid. Returns the format
    /// version that was read.
    ///
    /// # Errors
    ///
    /// Returns the first format error, unknown content ID or rejected value.
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> CodecResult<u8> {
        let (version, record) = cwm::decode(bytes)?;
        let mut loaded = Self::from_record(Arc::clone(&self.banks), &record)?;
        assert_invariants(&loaded);
        loaded.filename = self.filename.take();
        *self = loaded;
        Ok(version)
    }

    /// Encode the map in the given format version.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is unknown or the map cannot be
    /// represented in it.
    pub fn save_to_bytes(&self, version: u8) -> CodecResult<Vec<u8>> {
        cwm::encode(&self.to_record(), version)
    }

    /// Load a map file, replacing this map.
    ///
    /// On failure the error is logged and the map is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = fs::read(path)
            .map_err(CodecError::from)
            .and_then(|bytes| self.load_from_bytes(&bytes));
        match result {
            Ok(version) => {
                log::info!("loaded map file {} (version {version})", path.display());
                self.filename = Some(path.to_path_buf());
                true
            }
            Err(err) => {
                log::error!("failed to load map file {}: {err}", path.display());
                false
            }
        }
    }

    /// Save the map to a file in the given format version.
    pub fn save(&mut self, path: impl AsRef<Path>, version: u8) -> bool {
        let path = path.as_ref();
        let result = self
            .save_to_bytes(version)
            .and_then(|bytes| fs::write(path, bytes).map_err(CodecError::from));
        match result {
            Ok(()) => {
                log::info!("saved map file {} (version {version})", path.display());
                self.filename = Some(path.to_path_buf());
                true
            }
            Err(err) => {
                log::error!("failed to save map file {}: {err}", path.display());
                false
            }
        }
    }

    /// Save the map to the file it was last loaded from or saved to.
    pub fn resave(&mut self, version: u8) -> bool {
        let Some(path) = self.filename.clone() else {
            log::error!("resave cancelled: the map has never been loaded or saved");
            return false;
        };
        self.save(path, version)
    }

    /// The file the map was last loaded from or saved to.
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}
