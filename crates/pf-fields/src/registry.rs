//! Named object registry.
//!
//! The registry is the case database: solvers store their fields here and
//! options look them up by name. Lookups are hash-map reads; nothing is
//! recomputed.

use std::collections::HashMap;

use crate::error::{FieldError, FieldResult};
use crate::surface::SurfaceScalarField;
use crate::tensor::FieldValue;
use crate::vol::{
    VolField, VolScalarField, VolSphericalTensorField, VolSymmTensorField, VolTensorField,
    VolVectorField,
};

/// A volume field of any rank.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyVolField {
    Scalar(VolScalarField),
    Vector(VolVectorField),
    SymmTensor(VolSymmTensorField),
    SphericalTensor(VolSphericalTensorField),
    Tensor(VolTensorField),
}

impl AnyVolField {
    pub fn rank(&self) -> &'static str {
        match self {
            AnyVolField::Scalar(_) => "scalar",
            AnyVolField::Vector(_) => "vector",
            AnyVolField::SymmTensor(_) => "symmTensor",
            AnyVolField::SphericalTensor(_) => "sphericalTensor",
            AnyVolField::Tensor(_) => "tensor",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnyVolField::Scalar(f) => f.name(),
            AnyVolField::Vector(f) => f.name(),
            AnyVolField::SymmTensor(f) => f.name(),
            AnyVolField::SphericalTensor(f) => f.name(),
            AnyVolField::Tensor(f) => f.name(),
        }
    }
}

/// Store of named volume and surface fields.
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    vol: HashMap<String, AnyVolField>,
    surface: HashMap<String, SurfaceScalarField>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a volume field under its own name.
    pub fn insert<T: FieldValue>(&mut self, field: VolField<T>) -> FieldResult<()> {
        let name = field.name().to_string();
        if self.vol.contains_key(&name) || self.surface.contains_key(&name) {
            return Err(FieldError::Duplicate { name });
        }
        self.vol.insert(name, T::upcast(field));
        Ok(())
    }

    /// Register a face field under its own name.
    pub fn insert_surface(&mut self, field: SurfaceScalarField) -> FieldResult<()> {
        let name = field.name().to_string();
        if self.vol.contains_key(&name) || self.surface.contains_key(&name) {
            return Err(FieldError::Duplicate { name });
        }
        self.surface.insert(name, field);
        Ok(())
    }

    /// Replace (or add) a volume field, returning the previous entry.
    pub fn replace<T: FieldValue>(&mut self, field: VolField<T>) -> Option<AnyVolField> {
        let name = field.name().to_string();
        self.vol.insert(name, T::upcast(field))
    }

    /// Typed lookup of a volume field.
    pub fn lookup<T: FieldValue>(&self, name: &str) -> FieldResult<&VolField<T>> {
        let entry = self.vol.get(name).ok_or_else(|| FieldError::NotFound {
            name: name.to_string(),
        })?;
        T::downcast(entry).ok_or_else(|| FieldError::WrongType {
            name: name.to_string(),
            expected: T::RANK,
            found: entry.rank(),
        })
    }

    pub fn lookup_surface(&self, name: &str) -> FieldResult<&SurfaceScalarField> {
        self.surface.get(name).ok_or_else(|| FieldError::NotFound {
            name: name.to_string(),
        })
    }

    /// Whether a volume field of rank `T` is registered under `name`.
    pub fn found<T: FieldValue>(&self, name: &str) -> bool {
        self.vol.get(name).and_then(T::downcast).is_some()
    }

    pub fn found_surface(&self, name: &str) -> bool {
        self.surface.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .vol
            .keys()
            .chain(self.surface.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn vol_fields(&self) -> impl Iterator<Item = &AnyVolField> {
        self.vol.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Vector;
    use pf_core::Dimensions;
    use pf_mesh::Mesh;

    fn registry() -> ObjectRegistry {
        let mesh = Mesh::structured_1d(2, 1.0, 1.0).unwrap();
        let mut db = ObjectRegistry::new();
        db.insert(VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 300.0))
            .unwrap();
        db.insert(VolVectorField::uniform("U", Dimensions::VELOCITY, &mesh, Vector::x()))
            .unwrap();
        db.insert_surface(SurfaceScalarField::from_velocity("phi", &mesh, Vector::x()))
            .unwrap();
        db
    }

    #[test]
    fn typed_lookup() {
        let db = registry();
        assert_eq!(db.lookup::<f64>("T").unwrap().internal()[0], 300.0);
        assert!(db.found::<Vector>("U"));
        assert!(!db.found::<f64>("U"));
        assert!(db.found_surface("phi"));
        assert_eq!(db.names(), vec!["T", "U", "phi"]);
    }

    #[test]
    fn wrong_rank_reports_both_types() {
        let db = registry();
        let err = db.lookup::<f64>("U").unwrap_err();
        assert_eq!(
            err,
            FieldError::WrongType {
                name: "U".into(),
                expected: "scalar",
                found: "vector",
            }
        );
    }

    #[test]
    fn missing_and_duplicate() {
        let mut db = registry();
        assert!(matches!(
            db.lookup_surface("rhoPhi"),
            Err(FieldError::NotFound { .. })
        ));
        let mesh = Mesh::structured_1d(2, 1.0, 1.0).unwrap();
        let dup = VolScalarField::uniform("phi", Dimensions::DIMLESS, &mesh, 0.0);
        assert!(matches!(db.insert(dup), Err(FieldError::Duplicate { .. })));
    }
}
