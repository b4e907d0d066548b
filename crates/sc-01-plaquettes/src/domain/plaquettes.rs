//! Plaquette collections indexed by template plaquette index

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::rpng::RpngDescription;

/// Mapping from template plaquette indices to plaquette descriptions.
///
/// Indices missing from the collection are empty plaquettes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plaquettes {
    collection: BTreeMap<usize, RpngDescription>,
}

impl Plaquettes {
    pub fn new(collection: BTreeMap<usize, RpngDescription>) -> Self {
        Self { collection }
    }

    pub fn get(&self, index: usize) -> Option<&RpngDescription> {
        self.collection.get(&index).filter(|d| !d.is_empty())
    }

    pub fn collection(&self) -> &BTreeMap<usize, RpngDescription> {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Copy without the plaquettes at the given indices.
    pub fn without_plaquettes(&self, indices: &BTreeSet<usize>) -> Self {
        Self {
            collection: self
                .collection
                .iter()
                .filter(|(index, _)| !indices.contains(index))
                .map(|(index, desc)| (*index, *desc))
                .collect(),
        }
    }

    /// Copy with the given plaquettes inserted, replacing existing entries.
    pub fn with_updated_plaquettes(&self, updates: &BTreeMap<usize, RpngDescription>) -> Self {
        let mut collection = self.collection.clone();
        collection.extend(updates.iter().map(|(index, desc)| (*index, *desc)));
        Self { collection }
    }
}

impl FromIterator<(usize, RpngDescription)> for Plaquettes {
    fn from_iter<I: IntoIterator<Item = (usize, RpngDescription)>>(iter: I) -> Self {
        Self {
            collection: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(s: &str) -> RpngDescription {
        s.parse().unwrap()
    }

    fn sample() -> Plaquettes {
        Plaquettes::from_iter([
            (1, desc("-x1- -x2- -x3- -x4-")),
            (2, desc("-z1- -z3- -z2- -z4-")),
            (3, RpngDescription::empty()),
        ])
    }

    #[test]
    fn test_get_treats_empty_as_missing() {
        let plaquettes = sample();
        assert!(plaquettes.get(1).is_some());
        assert!(plaquettes.get(3).is_none());
        assert!(plaquettes.get(42).is_none());
    }

    #[test]
    fn test_without_plaquettes() {
        let trimmed = sample().without_plaquettes(&BTreeSet::from([1, 3]));
        assert_eq!(trimmed.len(), 1);
        assert!(trimmed.get(2).is_some());
        // Original untouched
        assert_eq!(sample().len(), 3);
    }

    #[test]
    fn test_with_updated_plaquettes() {
        let replacement = desc("---- ---- -x1- -x2-");
        let updated =
            sample().with_updated_plaquettes(&BTreeMap::from([(2, replacement), (7, replacement)]));
        assert_eq!(updated.get(2), Some(&replacement));
        assert_eq!(updated.get(7), Some(&replacement));
        assert_eq!(updated.len(), 4);
    }
}
