//! Parsed configuration of the volume-fraction option.

use crate::dict::OptionDict;
use crate::error::OptionResult;

/// Settings of one volume-fraction option.
///
/// Built from an [`OptionDict`] and replaced wholesale on re-read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeFractionConfig {
    /// Phase whose volume fraction is `alpha.<phase>`.
    pub phase: String,
    pub phi: String,
    pub rho: String,
    pub u: String,
    /// Fields corrected, in configuration order, without repeats.
    pub fields: Vec<String>,
    /// Optional symmetric-tensor field weighting diffusion per direction.
    pub anisotropy: Option<String>,
    pub active: bool,
}

impl VolumeFractionConfig {
    pub fn from_dict(option: &str, dict: &OptionDict) -> OptionResult<Self> {
        let phase = dict.lookup_word(option, "phase")?.to_string();
        let phi = dict.lookup_word_or(option, "phi", "phi")?;
        let rho = dict.lookup_word_or(option, "rho", "rho")?;
        let u = dict.lookup_word_or(option, "U", "U")?;

        let mut fields: Vec<String> = Vec::new();
        for field in dict.lookup_words(option, "fields")? {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        let anisotropy = if dict.contains("anisotropy") {
            Some(dict.lookup_word(option, "anisotropy")?.to_string())
        } else {
            None
        };
        let active = dict.lookup_bool_or(option, "active", true)?;

        Ok(Self {
            phase,
            phi,
            rho,
            u,
            fields,
            anisotropy,
            active,
        })
    }

    /// Name of the volume-fraction field.
    pub fn alpha_name(&self) -> String {
        format!("alpha.{}", self.phase)
    }

    /// Index of `field` in the configured list.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let dict = OptionDict::new()
            .with("type", "volumeFractionSource")
            .with("phase", "solid")
            .with("fields", vec!["rho", "U", "e", "U"]);
        let cfg = VolumeFractionConfig::from_dict("porosity", &dict).unwrap();
        assert_eq!(cfg.alpha_name(), "alpha.solid");
        assert_eq!(cfg.phi, "phi");
        assert_eq!(cfg.rho, "rho");
        assert_eq!(cfg.u, "U");
        assert_eq!(cfg.fields, vec!["rho", "U", "e"]);
        assert_eq!(cfg.field_index("e"), Some(2));
        assert_eq!(cfg.field_index("k"), None);
        assert!(cfg.active);
        assert!(cfg.anisotropy.is_none());
    }

    #[test]
    fn overrides_read() {
        let dict = OptionDict::new()
            .with("phase", "bed")
            .with("phi", "rhoPhi")
            .with("U", "U.air")
            .with("fields", "T")
            .with("anisotropy", "Kbed")
            .with("active", false);
        let cfg = VolumeFractionConfig::from_dict("porosity", &dict).unwrap();
        assert_eq!(cfg.phi, "rhoPhi");
        assert_eq!(cfg.u, "U.air");
        assert_eq!(cfg.fields, vec!["T"]);
        assert_eq!(cfg.anisotropy.as_deref(), Some("Kbed"));
        assert!(!cfg.active);
    }

    #[test]
    fn required_keys() {
        let no_phase = OptionDict::new().with("fields", vec!["T"]);
        assert!(VolumeFractionConfig::from_dict("p", &no_phase).is_err());
        let no_fields = OptionDict::new().with("phase", "solid");
        assert!(VolumeFractionConfig::from_dict("p", &no_fields).is_err());
    }
}
