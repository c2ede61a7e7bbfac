// SPDX-License-Identifier: Apache-2.0

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Insertion-ordered `key -> [values]` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: BTreeMap<String, usize>,
}

impl OrderedIndex {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn insert_new(&mut self, key: String, values: Vec<String>) {
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, values));
    }

    fn append(&mut self, key: &str, value: String) {
        match self.positions.get(key) {
            Some(&pos) => self.entries[pos].1.push(value),
            None => self.insert_new(key.to_string(), vec![value]),
        }
    }
}

impl Serialize for OrderedIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName(pub String);

/// Paired `name -> codes` and `code -> names` mappings.
///
/// Both sides only change through [`CrossReferenceIndex::insert`], which
/// updates them together; a name can be indexed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReferenceIndex {
    name_dict: OrderedIndex,
    code_dict: OrderedIndex,
}

impl CrossReferenceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, codes: Vec<String>) -> Result<(), DuplicateName> {
        if self.name_dict.contains_key(name) {
            return Err(DuplicateName(name.to_string()));
        }
        for code in &codes {
            self.code_dict.append(code, name.to_string());
        }
        self.name_dict.insert_new(name.to_string(), codes);
        Ok(())
    }

    #[must_use]
    pub fn name_dict(&self) -> &OrderedIndex {
        &self.name_dict
    }

    #[must_use]
    pub fn code_dict(&self) -> &OrderedIndex {
        &self.code_dict
    }

    #[must_use]
    pub fn codes_for(&self, name: &str) -> Option<&[String]> {
        self.name_dict.get(name)
    }

    #[must_use]
    pub fn names_for(&self, code: &str) -> Option<&[String]> {
        self.code_dict.get(code)
    }

    /// Checks both directions of the name/code correspondence.
    pub fn verify_consistency(&self) -> Result<(), String> {
        for (name, codes) in self.name_dict.iter() {
            for code in codes {
                let listed = self
                    .code_dict
                    .get(code)
                    .is_some_and(|names| names.iter().any(|n| n == name));
                if !listed {
                    return Err(format!("name `{name}` missing from code_dict[`{code}`]"));
                }
            }
        }
        for (code, names) in self.code_dict.iter() {
            for name in names {
                let listed = self
                    .name_dict
                    .get(name)
                    .is_some_and(|codes| codes.iter().any(|c| c == code));
                if !listed {
                    return Err(format!("code `{code}` missing from name_dict[`{name}`]"));
                }
            }
        }
        Ok(())
    }
}
