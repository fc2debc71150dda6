use std::{collections::BTreeMap, fmt, ops::Index};

use crate::{Unrecognized, Value, ValueError};

/// Parsed values, keyed by dest.
///
/// Every registered dest is present: actions that never matched keep their
/// default.
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Namespace {
    values: BTreeMap<String, Value>,
}

impl Namespace {
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// Typed access, e.g. `ns.get_as::<Vec<i64>>("numbers")`.
    pub fn get_as<T>(&self, dest: &str) -> Result<T, ValueError>
    where
        T: TryFrom<Value, Error = ValueError>,
    {
        let value = self.get(dest).ok_or_else(|| ValueError::Missing(dest.to_string()))?;
        T::try_from(value.clone())
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(dest, value)| (dest.as_str(), value))
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }

    pub(crate) fn set(&mut self, dest: &str, value: Value) {
        self.values.insert(dest.to_string(), value);
    }

    pub(crate) fn take(&mut self, dest: &str) -> Value {
        self.values.get_mut(dest).map(std::mem::take).unwrap_or_default()
    }
}

impl Index<&str> for Namespace {
    type Output = Value;

    fn index(&self, dest: &str) -> &Value {
        match self.get(dest) {
            Some(it) => it,
            None => panic!("no value stored under `{dest}`"),
        }
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(&self.values).finish()
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// The result of [`Registry::parse_known`](crate::Registry::parse_known).
#[derive(Debug, Clone, PartialEq)]
pub struct Matches {
    pub namespace: Namespace,
    /// Indices of every token some action consumed, ascending.
    pub consumed: Vec<usize>,
    /// Tokens nothing consumed, in input order.
    pub extras: Vec<Unrecognized>,
}
