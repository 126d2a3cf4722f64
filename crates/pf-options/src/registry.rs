//! Option types by name.

use std::collections::BTreeMap;

use crate::dict::OptionDict;
use crate::error::{OptionError, OptionResult};
use crate::option::FvOption;
use crate::volume_fraction::{self, VolumeFractionSource};

/// Builds an option from its name and dictionary.
pub type OptionFactory = fn(&str, &OptionDict) -> OptionResult<Box<dyn FvOption>>;

/// Map from `type` entries to constructors.
#[derive(Clone, Debug, Default)]
pub struct OptionRegistry {
    factories: BTreeMap<&'static str, OptionFactory>,
}

impl OptionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every option type this crate provides.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(volume_fraction::TYPE_NAME, VolumeFractionSource::create);
        registry
    }

    /// Add or replace a type.
    pub fn register(&mut self, type_name: &'static str, factory: OptionFactory) {
        self.factories.insert(type_name, factory);
    }

    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Construct option `name` from `dict`, dispatching on its `type` entry.
    pub fn create(&self, name: &str, dict: &OptionDict) -> OptionResult<Box<dyn FvOption>> {
        let type_name = dict.type_name(name)?;
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| OptionError::UnknownType {
                option: name.to_string(),
                type_name: type_name.to_string(),
            })?;
        factory(name, dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(type_name: &str) -> OptionDict {
        OptionDict::new()
            .with("type", type_name)
            .with("phase", "solid")
            .with("fields", vec!["T"])
    }

    #[test]
    fn builtin_types() {
        let registry = OptionRegistry::with_builtin();
        assert_eq!(registry.types().collect::<Vec<_>>(), vec!["volumeFractionSource"]);

        let option = registry.create("porosity", &dict("volumeFractionSource")).unwrap();
        assert_eq!(option.name(), "porosity");
        assert_eq!(option.type_name(), "volumeFractionSource");
        assert_eq!(option.apply_to_field("T"), Some(0));
    }

    #[test]
    fn unknown_and_missing_type() {
        let registry = OptionRegistry::with_builtin();
        let err = registry.create("heater", &dict("semiImplicitSource")).unwrap_err();
        assert!(matches!(err, OptionError::UnknownType { .. }));

        let untyped = OptionDict::new().with("phase", "solid");
        assert!(registry.create("p", &untyped).unwrap_err().is_configuration());
        assert!(OptionRegistry::new().create("p", &dict("volumeFractionSource")).is_err());
    }
}
