//! Option dictionaries: the keyword/value entries of one option.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OptionError, OptionResult};

/// A single dictionary entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Word(String),
    List(Vec<String>),
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Word(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Word(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Number(v)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::List(v)
    }
}

/// The entries of one option, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionDict {
    entries: BTreeMap<String, OptionValue>,
}

impl OptionDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Value of the `type` entry.
    pub fn type_name(&self, option: &str) -> OptionResult<&str> {
        self.lookup_word(option, "type")
    }

    /// Required word entry.
    pub fn lookup_word(&self, option: &str, key: &str) -> OptionResult<&str> {
        match self.entries.get(key) {
            Some(OptionValue::Word(w)) if !w.is_empty() => Ok(w.as_str()),
            Some(other) => Err(OptionError::configuration(
                option,
                format!("entry {key} must be a word, found {other:?}"),
            )),
            None => Err(OptionError::configuration(
                option,
                format!("missing required entry {key}"),
            )),
        }
    }

    /// Optional word entry with a default.
    pub fn lookup_word_or(&self, option: &str, key: &str, default: &str) -> OptionResult<String> {
        if self.entries.contains_key(key) {
            self.lookup_word(option, key).map(str::to_string)
        } else {
            Ok(default.to_string())
        }
    }

    /// Required list of words. A single word is read as a one-entry list.
    pub fn lookup_words(&self, option: &str, key: &str) -> OptionResult<Vec<String>> {
        match self.entries.get(key) {
            Some(OptionValue::List(items)) => Ok(items.clone()),
            Some(OptionValue::Word(w)) => Ok(vec![w.clone()]),
            Some(other) => Err(OptionError::configuration(
                option,
                format!("entry {key} must be a list of words, found {other:?}"),
            )),
            None => Err(OptionError::configuration(
                option,
                format!("missing required entry {key}"),
            )),
        }
    }

    /// Optional switch with a default.
    pub fn lookup_bool_or(&self, option: &str, key: &str, default: bool) -> OptionResult<bool> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(OptionValue::Bool(b)) => Ok(*b),
            Some(OptionValue::Word(w)) => match w.as_str() {
                "on" | "yes" | "true" => Ok(true),
                "off" | "no" | "false" => Ok(false),
                _ => Err(OptionError::configuration(
                    option,
                    format!("entry {key} must be a switch, found {w}"),
                )),
            },
            Some(other) => Err(OptionError::configuration(
                option,
                format!("entry {key} must be a switch, found {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        let dict = OptionDict::new()
            .with("type", "volumeFractionSource")
            .with("phase", "solid")
            .with("fields", vec!["rho", "U", "e"])
            .with("active", "off");

        assert_eq!(dict.type_name("porosity").unwrap(), "volumeFractionSource");
        assert_eq!(dict.lookup_word_or("porosity", "phi", "phi").unwrap(), "phi");
        assert_eq!(dict.lookup_words("porosity", "fields").unwrap().len(), 3);
        assert!(!dict.lookup_bool_or("porosity", "active", true).unwrap());
        assert!(dict.lookup_word("porosity", "rho").is_err());
    }

    #[test]
    fn wrong_kinds_are_configuration_errors() {
        let dict = OptionDict::new()
            .with("phase", vec!["a", "b"])
            .with("active", 2.0)
            .with("fields", true);
        assert!(dict.lookup_word("o", "phase").unwrap_err().is_configuration());
        assert!(dict.lookup_bool_or("o", "active", true).is_err());
        assert!(dict.lookup_words("o", "fields").is_err());
    }

    #[test]
    fn deserialize_from_yaml() {
        let yaml = "type: volumeFractionSource\nphase: solid\nfields: [T]\nactive: true\n";
        let dict: OptionDict = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dict.get("fields"), Some(&OptionValue::List(vec!["T".into()])));
        assert_eq!(dict.get("active"), Some(&OptionValue::Bool(true)));
        assert_eq!(dict.keys().count(), 4);
    }
}
