//! Required-field list: an ordered set of identifiers that serializes to the
//! comma-separated form the admin templates embed.

use std::fmt;
use std::str::FromStr;

use crate::membership::{Equality, Value, contains};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFields {
    ids: Vec<String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `"a,b,c"`. Empty segments are dropped and later duplicates are
    /// ignored, so `""` is the empty list.
    pub fn parse_csv(csv: &str) -> Self {
        let mut fields = Self::new();
        for id in csv.split(',') {
            fields.insert(id);
        }
        fields
    }

    pub fn to_csv(&self) -> String {
        self.ids.join(",")
    }

    /// Appends `id` unless it is empty or already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.contains_value(&Value::from(id))
    }

    /// Loose membership, the way form element ids are matched.
    pub fn contains_value(&self, needle: &Value) -> bool {
        let values = self.ids.iter().map(Value::from).collect::<Vec<_>>();
        contains(needle, &values, Equality::Loose)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromStr for RequiredFields {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_csv(s))
    }
}

impl fmt::Display for RequiredFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}

impl<'a> FromIterator<&'a str> for RequiredFields {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut fields = Self::new();
        for id in iter {
            fields.insert(id);
        }
        fields
    }
}

/// Adds `field` to a comma-separated list unless it is already there.
pub fn add_field(field: &str, csv: &str) -> String {
    let mut fields = RequiredFields::parse_csv(csv);
    fields.insert(field);
    fields.to_csv()
}

/// Removes every occurrence of `field` from a comma-separated list.
pub fn remove_field(field: &str, csv: &str) -> String {
    let mut fields = RequiredFields::parse_csv(csv);
    fields.remove(field);
    fields.to_csv()
}
