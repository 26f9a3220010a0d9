//! Generic ID- and name-indexed registry.

use std::collections::HashMap;
use std::ops::Deref;

use crate::error::LinkError;

/// Index of an entry within a [`PropertyBank`].
///
/// IDs are dense: a bank with `n` entries uses exactly `0..n`.
pub type BankId = u32;

/// One record in a bank, together with the identity the bank gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct BankEntry<T> {
    id: BankId,
    script_name: String,
    record: T,
}

impl<T> BankEntry<T> {
    /// The entry's position in its bank.
    #[must_use]
    pub const fn id(&self) -> BankId {
        self.id
    }

    /// The unique name scripts use to refer to this entry.
    #[must_use]
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// The record itself.
    #[must_use]
    pub const fn record(&self) -> &T {
        &self.record
    }
}

impl<T> Deref for BankEntry<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

/// An immutable registry of one kind of static content.
///
/// Built once, in order, and never patched. Reloading content means building
/// a new bank; IDs handed out by the old one mean nothing to the new one.
#[derive(Debug, Clone)]
pub struct PropertyBank<T> {
    /// Human-readable bank name, used in log and error messages.
    kind: &'static str,
    entries: Vec<BankEntry<T>>,
    by_name: HashMap<String, BankId>,
}

impl<T> PropertyBank<T> {
    /// Build a bank from `(script name, record)` pairs.
    ///
    /// IDs are assigned `0..n` in iteration order, so the order of the input
    /// decides game-visible identity.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::DuplicateName`] if two entries share a name.
    pub fn from_entries<I, S>(kind: &'static str, entries: I) -> Result<Self, LinkError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let mut bank = Self {
            kind,
            entries: Vec::new(),
            by_name: HashMap::new(),
        };
        for (name, record) in entries {
            let script_name = name.into();
            let id = match BankId::try_from(bank.entries.len()) {
                Ok(id) if id != BankId::MAX => id,
                // The last ID doubles as the "none" sentinel on the wire.
                _ => {
                    log::warn!("{kind} bank is full, ignoring \"{script_name}\" and later entries");
                    break;
                }
            };
            if bank.by_name.contains_key(&script_name) {
                return Err(LinkError::DuplicateName {
                    bank: kind,
                    name: script_name,
                });
            }
            bank.by_name.insert(script_name.clone(), id);
            bank.entries.push(BankEntry {
                id,
                script_name,
                record,
            });
        }
        Ok(bank)
    }

    /// Create a bank with no entries.
    #[must_use]
    pub fn empty(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Name of the kind of content this bank holds.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bank holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look an entry up by ID.
    #[must_use]
    #[inline]
    pub fn get(&self, id: BankId) -> Option<&BankEntry<T>> {
        self.entries.get(usize::try_from(id).ok()?)
    }

    /// Look an entry up by script name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&BankEntry<T>> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Check if `id` names an entry of this bank.
    #[must_use]
    #[inline]
    pub fn contains(&self, id: BankId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over entries in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &BankEntry<T>> {
        self.entries.iter()
    }

    /// Transform every record, keeping IDs and names.
    ///
    /// The closure sees the whole source entry so it can report which entry
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(self, mut f: F) -> Result<PropertyBank<U>, E>
    where
        F: FnMut(&BankEntry<T>) -> Result<U, E>,
    {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let record = f(entry)?;
            entries.push(BankEntry {
                id: entry.id,
                script_name: entry.script_name.clone(),
                record,
            });
        }
        Ok(PropertyBank {
            kind: self.kind,
            entries,
            by_name: self.by_name,
        })
    }
}

impl<'a, T> IntoIterator for &'a PropertyBank<T> {
    type Item = &'a BankEntry<T>;
    type IntoIter = std::slice::Iter<'a, BankEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
