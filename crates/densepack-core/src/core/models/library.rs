use super::asymmetric_unit::AsymmetricUnit;
use std::collections::BTreeMap;

/// All asymmetric units read from one space-group data file, keyed by group name.
#[derive(Debug, Clone, Default)]
pub struct SpaceGroupLibrary {
    groups: BTreeMap<String, AsymmetricUnit>,
}

impl SpaceGroupLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a group, returning the unit it replaced if the name was already present.
    pub fn insert(&mut self, name: &str, unit: AsymmetricUnit) -> Option<AsymmetricUnit> {
        self.groups.insert(name.to_string(), unit)
    }

    pub fn get(&self, name: &str) -> Option<&AsymmetricUnit> {
        self.groups.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AsymmetricUnit)> {
        self.groups.iter().map(|(name, unit)| (name.as_str(), unit))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
