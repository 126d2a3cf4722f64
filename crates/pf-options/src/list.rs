//! The ordered set of options attached to a case.

use std::collections::{BTreeMap, BTreeSet};

use pf_matrix::{FvContext, FvMatrix};
use tracing::{info, warn};

use crate::diagnostics::DiagnosticsSnapshot;
use crate::dict::OptionDict;
use crate::error::{OptionError, OptionResult};
use crate::option::{FvOption, SupField, SupMode};
use crate::registry::OptionRegistry;

/// Options in case order, plus a record of which fields each was applied to.
#[derive(Debug, Default)]
pub struct OptionList {
    options: Vec<Box<dyn FvOption>>,
    applied: BTreeSet<(usize, String)>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every option in `dicts` through `registry`.
    pub fn from_dicts(
        registry: &OptionRegistry,
        dicts: &BTreeMap<String, OptionDict>,
    ) -> OptionResult<Self> {
        let mut list = Self::new();
        for (name, dict) in dicts {
            list.push(registry.create(name, dict)?);
        }
        info!(count = list.len(), "options constructed");
        Ok(list)
    }

    pub fn push(&mut self, option: Box<dyn FvOption>) {
        self.options.push(option);
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn FvOption> {
        self.options.iter().map(|o| o.as_ref())
    }

    /// Whether any active option applies to `field`.
    pub fn applies_to(&self, field: &str) -> bool {
        self.iter()
            .any(|o| o.is_active() && o.apply_to_field(field).is_some())
    }

    /// Apply every active option that lists the equation's field.
    ///
    /// All options are applied to a copy first, so on error `eqn` is left
    /// as it was.
    pub fn add_sup<T: SupField>(
        &mut self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<T>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        let field = eqn.psi_name().to_string();
        let mut work = eqn.clone();
        let mut applied = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            if !option.is_active() || option.apply_to_field(&field).is_none() {
                continue;
            }
            T::add_sup_to(option.as_ref(), ctx, &mut work, mode)?;
            applied.push((i, field.clone()));
        }
        *eqn = work;
        self.applied.extend(applied);
        Ok(())
    }

    /// Configured (option, field) pairs that were never applied.
    ///
    /// Each one is logged as a warning: usually the solver does not call the
    /// options for that field, or the field name is misspelt.
    pub fn check_applied(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            if !option.is_active() {
                continue;
            }
            for field in option.field_names() {
                if !self.applied.contains(&(i, field.clone())) {
                    warn!(option = option.name(), field = %field, "option never applied to field");
                    missing.push((option.name().to_string(), field.clone()));
                }
            }
        }
        missing
    }

    /// Re-read each option whose name appears in `dicts`.
    ///
    /// Options that fail keep their previous settings; the failures are
    /// returned.
    pub fn read_all(&mut self, dicts: &BTreeMap<String, OptionDict>) -> Vec<(String, OptionError)> {
        let mut failures = Vec::new();
        for option in &mut self.options {
            let Some(dict) = dicts.get(option.name()) else {
                continue;
            };
            if let Err(err) = option.read(dict) {
                warn!(option = option.name(), error = %err, "re-read failed, keeping previous settings");
                failures.push((option.name().to_string(), err));
            }
        }
        failures
    }

    /// Diagnostics of every option, by name.
    pub fn diagnostics(&self) -> Vec<(String, DiagnosticsSnapshot)> {
        self.iter()
            .map(|o| (o.name().to_string(), o.diagnostics()))
            .collect()
    }
}
