//! Name ↔ slot mappings and serializable mapping profiles.
//!
//! A [`SlotMap`] associates symbolic names with physical slot indices for
//! one device, buttons and axes kept in separate maps. Bindings are strict:
//! a name is bound by exactly one entry (which may fan it out across several
//! slots) and a slot belongs to exactly one name. Rebinding either is a
//! [`BindingError`]; existing bindings are never silently replaced.
//!
//! [`MappingProfile`] is the serializable form, loadable from TOML or JSON,
//! applied entry by entry with the same duplicate rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default button names for a standard 17-button controller, by slot.
pub const DEFAULT_BUTTONS: [(&str, u32); 17] = [
    ("button_1", 0),
    ("button_2", 1),
    ("button_3", 2),
    ("button_4", 3),
    ("left_shoulder_button", 4),
    ("right_shoulder_button", 5),
    ("left_trigger", 6),
    ("right_trigger", 7),
    ("options", 8),
    ("start", 9),
    ("left_axis_button", 10),
    ("right_axis_button", 11),
    ("d_pad_up", 12),
    ("d_pad_down", 13),
    ("d_pad_left", 14),
    ("d_pad_right", 15),
    ("vendor", 16),
];

/// Default axis-pair names for a two-stick controller, by pair slot.
pub const DEFAULT_AXES: [(&str, u32); 2] = [("left_stick_axis", 0), ("right_stick_axis", 1)];

/// Configuration errors raised synchronously at bind time.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The name already has an entry in this mapping.
    #[error("'{key}' has already been defined in this mapping")]
    DuplicateKey { key: String },

    /// The slot already belongs to another name in this mapping.
    #[error("slot {slot} has already been bound to '{key}'")]
    DuplicateSlot { slot: u32, key: String },

    #[error("failed to parse mapping profile: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse mapping profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bidirectional name ↔ slot association for one device mapping.
#[derive(Clone, Debug, Default)]
pub struct SlotMap {
    names: BTreeMap<String, Vec<u32>>,
    slots: BTreeMap<u32, String>,
}

impl SlotMap {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from a constant name/slot table.
    ///
    /// The built-in tables have unique names and slots, so binding cannot
    /// fail for them.
    pub(crate) fn from_table(table: &[(&str, u32)]) -> Self {
        let mut map = Self::new();
        for &(name, slot) in table {
            map.bind(name, &[slot])
                .expect("built-in mapping tables are disjoint");
        }
        map
    }

    /// Bind `name` to one or more physical slots.
    ///
    /// Fails without modifying the map if the name already has an entry, if
    /// any slot is already bound, or if the slot list repeats a slot.
    pub fn bind(&mut self, name: &str, slots: &[u32]) -> Result<(), BindingError> {
        if self.names.contains_key(name) {
            return Err(BindingError::DuplicateKey {
                key: name.to_string(),
            });
        }
        for (i, &slot) in slots.iter().enumerate() {
            if let Some(owner) = self.slots.get(&slot) {
                return Err(BindingError::DuplicateSlot {
                    slot,
                    key: owner.clone(),
                });
            }
            if slots[..i].contains(&slot) {
                return Err(BindingError::DuplicateSlot {
                    slot,
                    key: name.to_string(),
                });
            }
        }
        for &slot in slots {
            self.slots.insert(slot, name.to_string());
        }
        self.names.insert(name.to_string(), slots.to_vec());
        Ok(())
    }

    /// Slots bound to `name`, empty when unbound.
    #[inline]
    pub fn slots_of(&self, name: &str) -> &[u32] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Name owning `slot`, if any.
    #[inline]
    pub fn name_of(&self, slot: u32) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    /// Iterate `(name, slots)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of bound names.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.names.clear();
        self.slots.clear();
    }
}

/// One profile entry: a single slot or a fan-out list of slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotSpec {
    One(u32),
    Many(Vec<u32>),
}

impl SlotSpec {
    /// View the entry as a slot slice.
    pub fn slots(&self) -> &[u32] {
        match self {
            SlotSpec::One(slot) => std::slice::from_ref(slot),
            SlotSpec::Many(slots) => slots.as_slice(),
        }
    }
}

/// Serializable mapping profile for both tables of a session.
///
/// ```toml
/// name = "flight"
///
/// [buttons]
/// fire = 0
/// trim = [6, 7]
///
/// [axes]
/// cyclic = 0
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MappingProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buttons: BTreeMap<String, SlotSpec>,
    #[serde(default)]
    pub axes: BTreeMap<String, SlotSpec>,
}

impl MappingProfile {
    /// Parse a profile from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, BindingError> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a profile from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, BindingError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_and_resolves_both_directions() {
        let mut map = SlotMap::new();
        map.bind("fire", &[0]).unwrap();
        map.bind("trim", &[6, 7]).unwrap();
        assert_eq!(map.slots_of("fire"), &[0]);
        assert_eq!(map.slots_of("trim"), &[6, 7]);
        assert_eq!(map.name_of(7), Some("trim"));
        assert_eq!(map.name_of(1), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn duplicate_name_is_rejected_and_map_unchanged() {
        let mut map = SlotMap::new();
        map.bind("fire", &[0]).unwrap();
        let err = map.bind("fire", &[1]).unwrap_err();
        assert!(matches!(err, BindingError::DuplicateKey { .. }));
        assert_eq!(map.slots_of("fire"), &[0]);
        assert_eq!(map.name_of(1), None);
    }

    #[test]
    fn duplicate_slot_is_rejected_and_map_unchanged() {
        let mut map = SlotMap::new();
        map.bind("fire", &[0]).unwrap();
        let err = map.bind("alt", &[2, 0]).unwrap_err();
        assert!(matches!(err, BindingError::DuplicateSlot { slot: 0, .. }));
        // The non-conflicting slot from the failed entry must not leak in.
        assert_eq!(map.name_of(2), None);
        assert_eq!(map.slots_of("alt"), &[] as &[u32]);
    }

    #[test]
    fn repeated_slot_within_one_entry_is_rejected() {
        let mut map = SlotMap::new();
        let err = map.bind("fire", &[3, 3]).unwrap_err();
        assert!(matches!(err, BindingError::DuplicateSlot { slot: 3, .. }));
        assert!(map.is_empty());
    }

    #[test]
    fn default_tables_build_cleanly() {
        let buttons = SlotMap::from_table(&DEFAULT_BUTTONS);
        let axes = SlotMap::from_table(&DEFAULT_AXES);
        assert_eq!(buttons.len(), 17);
        assert_eq!(axes.len(), 2);
        assert_eq!(buttons.slots_of("vendor"), &[16]);
        assert_eq!(axes.name_of(1), Some("right_stick_axis"));
    }

    #[test]
    fn profile_parses_from_toml_and_json() {
        let toml_text = r#"
            name = "flight"

            [buttons]
            fire = 0
            trim = [6, 7]

            [axes]
            cyclic = 0
        "#;
        let profile = MappingProfile::from_toml(toml_text).unwrap();
        assert_eq!(profile.name.as_deref(), Some("flight"));
        assert_eq!(profile.buttons["trim"].slots(), &[6, 7]);

        let json_text = r#"{ "buttons": { "fire": 0 }, "axes": {} }"#;
        let profile = MappingProfile::from_json(json_text).unwrap();
        assert_eq!(profile.buttons["fire"].slots(), &[0]);
        assert!(profile.axes.is_empty());
    }

    #[test]
    fn profile_parse_errors_surface() {
        assert!(MappingProfile::from_toml("buttons = 3").is_err());
        assert!(MappingProfile::from_json("{").is_err());
    }

    #[test]
    fn clear_empties_both_directions() {
        let mut map = SlotMap::from_table(&DEFAULT_AXES);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.name_of(0), None);
        // A cleared slot can be rebound.
        map.bind("left_stick_axis", &[0]).unwrap();
    }
}
