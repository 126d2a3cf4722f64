use pf_fields::ObjectRegistry;
use pf_mesh::Mesh;

use crate::schemes::Schemes;
use crate::time::TimeState;

/// Everything an equation assembly borrows from the case for one call.
#[derive(Clone, Copy, Debug)]
pub struct FvContext<'a> {
    pub mesh: &'a Mesh,
    pub registry: &'a ObjectRegistry,
    pub schemes: &'a Schemes,
    pub time: &'a TimeState,
}

impl<'a> FvContext<'a> {
    pub fn new(
        mesh: &'a Mesh,
        registry: &'a ObjectRegistry,
        schemes: &'a Schemes,
        time: &'a TimeState,
    ) -> Self {
        Self {
            mesh,
            registry,
            schemes,
            time,
        }
    }
}
