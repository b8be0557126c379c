//! String interning for facility names.
//!
//! Converts facility names to dense integer IDs so level state and
//! dependency sets can use vectors and small integer sets.

use rustc_hash::FxHashMap;

/// Interned facility ID (u32 for compact storage and fast hashing).
pub type FacilityId = u32;

/// String interner that maps facility names to integers.
#[derive(Debug, Clone)]
pub struct FacilityInterner {
    to_int: FxHashMap<String, FacilityId>,
    from_int: Vec<String>,
}

impl FacilityInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern a name, returning its integer ID.
    /// IDs are handed out in first-seen order.
    pub fn intern(&mut self, s: &str) -> FacilityId {
        if let Some(&id) = self.to_int.get(s) {
            return id;
        }
        let id = self.from_int.len() as FacilityId;
        self.from_int.push(s.to_string());
        self.to_int.insert(s.to_string(), id);
        id
    }

    #[inline]
    pub fn get(&self, s: &str) -> Option<FacilityId> {
        self.to_int.get(s).copied()
    }

    /// Name for an ID. Panics on an ID this interner never produced.
    #[inline]
    pub fn name(&self, id: FacilityId) -> &str {
        &self.from_int[id as usize]
    }

    /// All names in ID order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.from_int.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

impl Default for FacilityInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_name() {
        let mut interner = FacilityInterner::with_capacity(4);

        let woodcutter = interner.intern("Woodcutter");
        let sawmill = interner.intern("Sawmill");
        let again = interner.intern("Woodcutter");

        assert_eq!(woodcutter, again);
        assert_ne!(woodcutter, sawmill);
        assert_eq!(woodcutter, 0);
        assert_eq!(sawmill, 1);

        assert_eq!(interner.name(sawmill), "Sawmill");
        assert_eq!(interner.get("Woodcutter"), Some(woodcutter));
        assert_eq!(interner.get("Bakery"), None);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_names_in_id_order() {
        let mut interner = FacilityInterner::default();
        assert!(interner.is_empty());
        interner.intern("Cropland");
        interner.intern("Grain Mill");
        interner.intern("Cropland");

        let names: Vec<&str> = interner.names().collect();
        assert_eq!(names, vec!["Cropland", "Grain Mill"]);
    }
}
