use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductOption;

/// Option name → chosen value. At most one value per option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionMap(BTreeMap<String, String>);

impl SelectionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, option_name: &str) -> Option<&str> {
        self.0.get(option_name).map(String::as_str)
    }

    /// Sets `option_name` to `value`, replacing any earlier pick.
    pub fn insert(&mut self, option_name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(option_name.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns a copy with one extra pick applied; `self` is left untouched.
    #[must_use]
    pub fn with(&self, option_name: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.insert(option_name, value);
        next
    }

    /// `true` when every option in `options` has a selected value.
    #[must_use]
    pub fn is_complete(&self, options: &[ProductOption]) -> bool {
        options.iter().all(|o| self.0.contains_key(&o.name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
