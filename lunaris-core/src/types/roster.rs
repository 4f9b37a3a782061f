//! Identity roster and acting-user types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static mapping of user id → display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(HashMap<String, String>);

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Add or replace a display name
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(id.into(), name.into());
    }

    /// Display name for `id`; unknown ids are returned verbatim
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.0.get(id).map_or(id, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Roster
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The authenticated user performing an action, with role flags.
///
/// Passed explicitly to the services instead of being read from a global
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub user_id: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_training_manager: bool,
}

impl Viewer {
    /// Regular team member
    #[must_use]
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
            is_training_manager: false,
        }
    }

    #[must_use]
    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::member(user_id)
        }
    }

    #[must_use]
    pub fn training_manager(user_id: impl Into<String>) -> Self {
        Self {
            is_training_manager: true,
            ..Self::member(user_id)
        }
    }
}
