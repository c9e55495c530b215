//! Accumulator for entity-level and per-property errors.
//!
//! Errors are never overwritten: adding a second message under a key appends
//! to the messages already recorded there.

use std::collections::BTreeMap;

/// Where an error is attached.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    /// The profile as a whole.
    Entity,
    /// A named property of the profile.
    Property(String),
}

impl ErrorKey {
    /// Key for the property named `name`.
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }
}

impl std::fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity => f.write_str("<entity>"),
            Self::Property(name) => f.write_str(name),
        }
    }
}

/// Per-key error messages for one profile.
///
/// # Example
///
/// ```
/// use trellis_profiles::{ErrorBag, ErrorKey};
///
/// let mut errors = ErrorBag::new();
/// errors.add(ErrorKey::property("url"), "must be https");
/// errors.add(ErrorKey::property("url"), "must not be blank");
/// assert_eq!(errors.get(&ErrorKey::property("url")).len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBag {
    entries: BTreeMap<ErrorKey, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Appends `message` under `key`.
    pub fn add(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.entries.entry(key).or_default().push(message.into());
    }

    /// Appends an entity-level message.
    pub fn add_entity(&mut self, message: impl Into<String>) {
        self.add(ErrorKey::Entity, message);
    }

    /// Appends `message` for `key`, falling back to the entity level when
    /// `is_known` does not recognise the key. Returns where it landed.
    pub fn add_routed(
        &mut self,
        key: &str,
        message: impl Into<String>,
        is_known: impl Fn(&str) -> bool,
    ) -> ErrorKey {
        let target = if is_known(key) {
            ErrorKey::property(key)
        } else {
            ErrorKey::Entity
        };
        self.add(target.clone(), message);
        target
    }

    /// Returns `true` when any key carries at least one message.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.values().any(|messages| !messages.is_empty())
    }

    /// Messages recorded under `key`, empty when there are none.
    #[must_use]
    pub fn get(&self, key: &ErrorKey) -> &[String] {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entity-level messages.
    #[must_use]
    pub fn entity_errors(&self) -> &[String] {
        self.get(&ErrorKey::Entity)
    }

    /// Messages recorded for the property `name`.
    #[must_use]
    pub fn property_errors(&self, name: &str) -> &[String] {
        self.get(&ErrorKey::property(name))
    }

    /// Iterates over `(key, message)` pairs, entity-level first.
    pub fn iter(&self) -> impl Iterator<Item = (&ErrorKey, &str)> {
        self.entries
            .iter()
            .flat_map(|(key, messages)| messages.iter().map(move |m| (key, m.as_str())))
    }

    /// Every message, flattened, entity-level first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.iter().map(|(_, message)| message.to_owned()).collect()
    }

    /// Total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns `true` when no message has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
