//! Unit ID allocation.

use std::fmt;
use std::num::NonZeroU32;

/// Identifier of a unit on a map.
///
/// `0` is reserved to mean "no unit" and cannot be represented; use
/// `Option<UnitId>` where a unit may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(NonZeroU32);

impl UnitId {
    /// The first ID a fresh map hands out.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// The largest ID.
    pub const MAX: Self = Self(NonZeroU32::MAX);

    /// Wrap a raw ID, rejecting the reserved `0`.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw ID.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The following ID, wrapping from [`Self::MAX`] to [`Self::FIRST`].
    #[must_use]
    pub fn next_wrapping(self) -> Self {
        Self::new(self.get().wrapping_add(1)).unwrap_or(Self::FIRST)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Number of live units at which no ID is left to hand out.
const ID_SPACE: usize = (u32::MAX - 1) as usize;

/// Cyclic linear-probe allocator.
///
/// Remembers the last ID it issued and searches forwards from there for one
/// that is free, so IDs are reused once the search wraps around. While the
/// map has no units at all, the last ID is handed out again unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitIdAllocator {
    last: UnitId,
}

impl Default for UnitIdAllocator {
    fn default() -> Self {
        Self {
            last: UnitId::FIRST,
        }
    }
}

impl UnitIdAllocator {
    /// Create an allocator that continues after `last`.
    #[must_use]
    pub const fn resume_after(last: UnitId) -> Self {
        Self { last }
    }

    /// The most recently issued ID.
    #[must_use]
    pub const fn last(&self) -> UnitId {
        self.last
    }

    /// Find a free ID.
    ///
    /// `live` is the number of units currently on the map and `in_use`
    /// reports whether an ID belongs to one of them. Returns `None` when every
    /// ID is taken.
    pub fn allocate(&mut self, live: usize, in_use: impl Fn(UnitId) -> bool) -> Option<UnitId> {
        if live == 0 {
            return Some(self.last);
        }
        if live >= ID_SPACE {
            return None;
        }
        let mut candidate = self.last.next_wrapping();
        while in_use(candidate) {
            candidate = candidate.next_wrapping();
        }
        self.last = candidate;
        Some(candidate)
    }
}
