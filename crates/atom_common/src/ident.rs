//! Interned names for cheap copying and O(1) equality comparison.

use lasso::Rodeo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A handle to an interned string owned by one [`Interner`].
///
/// Every block, port, and net name in a netlist is stored once and referenced
/// by a `StringId`. The handle is only meaningful for the interner that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StringId(u32);

impl StringId {
    /// Wraps a raw handle value. Handles for real strings come from
    /// [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the handle value, which is also the string's issue position.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "str#{}", self.0)
    }
}

// SAFETY: every `u32` fits in a `usize` on supported targets, and
// `try_from_usize` refuses indices above `u32::MAX`.
unsafe impl lasso::Key for StringId {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(StringId)
    }
}

/// Single-owner string interner backed by [`lasso::Rodeo`].
///
/// The forward table (handle to text) and the reverse table (text to handle)
/// are kept by the rodeo itself, so interning is always a bijection between
/// distinct text values and the handles `0..len()`.
#[derive(Debug, Clone)]
pub struct Interner {
    rodeo: Rodeo<StringId>,
}

impl Interner {
    /// Creates an interner holding no strings.
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }

    /// Returns the handle of `s`, interning it first if it is new.
    pub fn get_or_intern(&mut self, s: &str) -> StringId {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the identifier of `s` if it has been interned. Never allocates.
    pub fn get(&self, s: &str) -> Option<StringId> {
        self.rodeo.get(s)
    }

    /// Resolves a [`StringId`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `StringId` was not created by this interner.
    pub fn resolve(&self, id: StringId) -> &str {
        self.rodeo.resolve(&id)
    }

    /// Resolves a [`StringId`], returning `None` if this interner never issued it.
    pub fn try_resolve(&self, id: StringId) -> Option<&str> {
        self.rodeo.try_resolve(&id)
    }

    /// Returns `true` if `id` was issued by this interner.
    pub fn contains(&self, id: StringId) -> bool {
        self.rodeo.contains_key(&id)
    }

    /// Returns the number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Iterates over `(StringId, &str)` pairs in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.rodeo.iter()
    }

    /// Builds a fresh interner holding only the strings selected by `keep`.
    ///
    /// Surviving strings keep their relative order and receive contiguous
    /// handles starting at zero. The returned map is indexed by old raw handle
    /// and holds the new handle, or `None` for dropped strings.
    pub fn compact(&self, mut keep: impl FnMut(StringId) -> bool) -> (Self, Vec<Option<StringId>>) {
        let mut compacted = Self::new();
        let mut map = vec![None; self.len()];
        for (id, text) in self.iter() {
            if keep(id) {
                map[id.as_raw() as usize] = Some(compacted.get_or_intern(text));
            }
        }
        (compacted, map)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_resolve_roundtrip() {
        let mut interner = Interner::new();
        let id = interner.get_or_intern("lut_0");
        assert_eq!(interner.resolve(id), "lut_0");
    }

    #[test]
    fn same_string_same_id() {
        let mut interner = Interner::new();
        let a = interner.get_or_intern("net_a");
        let b = interner.get_or_intern("net_a");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn different_strings_different_ids() {
        let mut interner = Interner::new();
        let a = interner.get_or_intern("foo");
        let b = interner.get_or_intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn get_does_not_allocate() {
        let mut interner = Interner::new();
        assert_eq!(interner.get("missing"), None);
        assert!(interner.is_empty());
        let id = interner.get_or_intern("present");
        assert_eq!(interner.get("present"), Some(id));
    }

    #[test]
    fn handles_are_issued_densely() {
        let mut interner = Interner::new();
        let ids: Vec<u32> = ["a", "b", "c"]
            .iter()
            .map(|s| interner.get_or_intern(s).as_raw())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn try_resolve_foreign_id() {
        let interner = Interner::new();
        assert!(!interner.contains(StringId::from_raw(3)));
        assert_eq!(interner.try_resolve(StringId::from_raw(3)), None);
    }

    #[test]
    fn compact_keeps_order_and_remaps() {
        let mut interner = Interner::new();
        let a = interner.get_or_intern("a");
        let b = interner.get_or_intern("b");
        let c = interner.get_or_intern("c");

        let (compacted, map) = interner.compact(|id| id != b);
        assert_eq!(compacted.len(), 2);
        assert_eq!(map[b.as_raw() as usize], None);

        let new_a = map[a.as_raw() as usize].unwrap();
        let new_c = map[c.as_raw() as usize].unwrap();
        assert_eq!(new_a.as_raw(), 0);
        assert_eq!(new_c.as_raw(), 1);
        assert_eq!(compacted.resolve(new_c), "c");
        assert_eq!(compacted.get("b"), None);
    }

    #[test]
    fn serde_roundtrip() {
        let id = StringId(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: StringId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
