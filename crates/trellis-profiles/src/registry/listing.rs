//! Ordered, id-keyed view of a profile family.

use std::collections::HashMap;

use crate::profile::PluginProfile;

/// Profiles keyed by id, in the family's document order.
///
/// A repeated id keeps the position of its first occurrence and the value of
/// its last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileListing<P> {
    profiles: Vec<P>,
    positions: HashMap<String, usize>,
}

impl<P: PluginProfile> ProfileListing<P> {
    pub(crate) fn from_profiles<'a>(family: impl IntoIterator<Item = &'a P>) -> Self {
        let mut listing = Self {
            profiles: Vec::new(),
            positions: HashMap::new(),
        };
        for profile in family {
            match listing.positions.get(profile.id()).copied() {
                Some(position) => {
                    if let Some(slot) = listing.profiles.get_mut(position) {
                        *slot = profile.clone();
                    }
                }
                None => {
                    listing
                        .positions
                        .insert(profile.id().to_owned(), listing.profiles.len());
                    listing.profiles.push(profile.clone());
                }
            }
        }
        listing
    }

    /// Profile with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&P> {
        self.positions
            .get(id)
            .and_then(|position| self.profiles.get(*position))
    }

    /// Returns `true` when a profile carries `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(PluginProfile::id)
    }

    /// `(id, profile)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &P)> {
        self.profiles.iter().map(|profile| (profile.id(), profile))
    }

    /// Number of distinct ids.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` when the family is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<P> {
        self.profiles
    }
}

impl<P> IntoIterator for ProfileListing<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.into_iter()
    }
}
