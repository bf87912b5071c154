//! Value membership with script-style loose or strict equality.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Numeric coercion used by loose comparisons.
    fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Number(v) => *v,
            Self::String(v) => parse_script_number(v),
        }
    }

    pub fn strict_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Number(l), Self::Number(r)) => l == r,
            (Self::String(l), Self::String(r)) => l == r,
            _ => false,
        }
    }

    pub fn loose_equal(&self, other: &Value) -> bool {
        if self.strict_equal(other) {
            return true;
        }

        match (self, other) {
            (Self::Null, Self::Undefined) | (Self::Undefined, Self::Null) => true,
            (Self::Number(_), Self::String(_)) | (Self::String(_), Self::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Self::Bool(_), _) => Value::Number(self.to_number()).loose_equal(other),
            (_, Self::Bool(_)) => self.loose_equal(&Value::Number(other.to_number())),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// String-to-number coercion: surrounding whitespace is ignored, an empty
/// string is zero, anything that is not a complete number is `NaN`.
pub(crate) fn parse_script_number(src: &str) -> f64 {
    let trimmed = src.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_radix(hex, 16);
    }
    if let Some(octal) = trimmed
        .strip_prefix("0o")
        .or_else(|| trimmed.strip_prefix("0O"))
    {
        return parse_radix(octal, 8);
    }
    if let Some(binary) = trimmed
        .strip_prefix("0b")
        .or_else(|| trimmed.strip_prefix("0B"))
    {
        return parse_radix(binary, 2);
    }
    // Rust accepts "inf" and "nan" spellings that scripts do not.
    if trimmed
        .chars()
        .any(|ch| !(ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut out = 0.0f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return f64::NAN;
        };
        out = out * f64::from(radix) + f64::from(digit);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Equality {
    #[default]
    Loose,
    Strict,
}

/// Ordered collection of keyed values. Sequences get the keys `"0"`, `"1"`, ...
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Haystack {
    entries: Vec<(String, Value)>,
}

impl Haystack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Inserts or replaces the value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        let key = self.entries.len().to_string();
        self.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn contains(&self, needle: &Value, equality: Equality) -> bool {
        contains(needle, self.values(), equality)
    }

    pub fn contains_loose(&self, needle: &Value) -> bool {
        self.contains(needle, Equality::Loose)
    }

    pub fn contains_strict(&self, needle: &Value) -> bool {
        self.contains(needle, Equality::Strict)
    }
}

impl<V: Into<Value>> FromIterator<V> for Haystack {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut haystack = Self::new();
        for value in iter {
            haystack.push(value);
        }
        haystack
    }
}

/// Whether `needle` occurs among `haystack`'s values. An `Undefined` needle
/// never matches.
pub fn contains<'a, I>(needle: &Value, haystack: I, equality: Equality) -> bool
where
    I: IntoIterator<Item = &'a Value>,
{
    if matches!(needle, Value::Undefined) {
        return false;
    }
    haystack.into_iter().any(|candidate| match equality {
        Equality::Loose => candidate.loose_equal(needle),
        Equality::Strict => candidate.strict_equal(needle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_number_matches_numeric_string() {
        let haystack: Haystack = ["1", "2", "3"].into_iter().collect();
        assert!(haystack.contains_loose(&Value::from(1)));
        assert!(!haystack.contains_strict(&Value::from(1)));
        assert!(haystack.contains_strict(&Value::from("1")));
    }

    #[test]
    fn keyed_haystack_searches_values_not_keys() {
        let haystack =
            Haystack::from_entries([("0", "Kevin"), ("vlado", "van"), ("1", "Zonneveld")]);
        assert!(haystack.contains_loose(&Value::from("van")));
        assert!(!haystack.contains_loose(&Value::from("vlado")));
        assert_eq!(haystack.get("vlado"), Some(&Value::from("van")));
    }

    #[test]
    fn empty_haystack_and_undefined_needle_never_match() {
        assert!(!Haystack::new().contains_loose(&Value::from("x")));
        let haystack: Haystack = [Value::Undefined, Value::Null].into_iter().collect();
        assert!(!haystack.contains_loose(&Value::Undefined));
        assert!(haystack.contains_strict(&Value::Null));
    }

    #[test]
    fn loose_coercions_follow_script_rules() {
        assert!(Value::Null.loose_equal(&Value::Undefined));
        assert!(!Value::Null.loose_equal(&Value::from(0)));
        assert!(Value::from(true).loose_equal(&Value::from("1")));
        assert!(Value::from(false).loose_equal(&Value::from("")));
        assert!(Value::from(0).loose_equal(&Value::from("  ")));
        assert!(Value::from(255).loose_equal(&Value::from("0xff")));
        assert!(!Value::from(f64::NAN).loose_equal(&Value::from(f64::NAN)));
        assert!(!Value::from(1).loose_equal(&Value::from("1abc")));
        assert!(!Value::from(f64::INFINITY).loose_equal(&Value::from("inf")));
    }

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let mut haystack = Haystack::new();
        haystack.insert("a", 1);
        haystack.insert("b", 2);
        haystack.insert("a", 3);
        assert_eq!(haystack.len(), 2);
        assert_eq!(haystack.values().cloned().collect::<Vec<_>>(), vec![
            Value::from(3),
            Value::from(2)
        ]);
    }
}
