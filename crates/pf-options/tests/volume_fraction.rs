//! Volume-fraction option applied through its public entry points.

use pf_core::{Dimensions, Real, Tolerances, nearly_equal, s};
use pf_fields::{
    FieldValue, ObjectRegistry, PatchValue, Scalar, SphericalTensor, SurfaceScalarField,
    SymmTensor, Vector, VolScalarField, VolSphericalTensorField, VolSymmTensorField,
    VolVectorField,
};
use pf_matrix::{ConvectionScheme, FvContext, FvMatrix, Schemes, TimeState, fvm};
use pf_mesh::Mesh;
use pf_options::laplacian::face_diffusivity;
use pf_options::{FieldRole, One, OptionDict, SupMode, VolumeFractionSource};
use proptest::prelude::*;

/// Unit-volume cells along x, unit time step.
struct Case {
    mesh: Mesh,
    db: ObjectRegistry,
    schemes: Schemes,
    time: TimeState,
}

impl Case {
    fn new(fraction: Vec<Real>) -> Self {
        Self::with_flux(fraction, Vector::x())
    }

    fn with_flux(fraction: Vec<Real>, velocity: Vector) -> Self {
        let n = fraction.len();
        let mesh = Mesh::structured_1d(n, n as Real, 1.0).unwrap();
        let mut db = ObjectRegistry::new();
        let zero_gradient = vec![PatchValue::ZeroGradient; mesh.n_boundary_faces()];

        db.insert(VolScalarField::new(
            "alpha.solid",
            Dimensions::DIMLESS,
            fraction,
            zero_gradient.clone(),
        ))
        .unwrap();

        let mut t = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 300.0);
        t.set_patch(0, PatchValue::Fixed(400.0));
        db.insert(t.with_old_time(vec![290.0; n])).unwrap();
        db.insert(VolVectorField::uniform("U", Dimensions::VELOCITY, &mesh, velocity))
            .unwrap();
        db.insert(VolScalarField::uniform("rho", Dimensions::DENSITY, &mesh, 1.2))
            .unwrap();
        db.insert(VolScalarField::new(
            "D.T",
            Dimensions::KINEMATIC_DIFFUSIVITY,
            (0..n).map(|i| 0.1 * (i + 1) as Real).collect(),
            zero_gradient,
        ))
        .unwrap();
        db.insert_surface(SurfaceScalarField::from_velocity("phi", &mesh, velocity))
            .unwrap();

        Self {
            mesh,
            db,
            schemes: Schemes::new(),
            time: TimeState::new(s(1.0)).unwrap(),
        }
    }

    /// Zero `D.T`, leaving storage and convection only.
    fn without_diffusion(mut self) -> Self {
        let d = VolScalarField::uniform("D.T", Dimensions::KINEMATIC_DIFFUSIVITY, &self.mesh, 0.0);
        self.db.replace(d);
        self
    }

    fn ctx(&self) -> FvContext<'_> {
        FvContext::new(&self.mesh, &self.db, &self.schemes, &self.time)
    }

    fn scalar(&self, name: &str) -> &VolScalarField {
        self.db.lookup::<Scalar>(name).unwrap()
    }

    fn flux(&self) -> &SurfaceScalarField {
        self.db.lookup_surface("phi").unwrap()
    }

    /// `d(T)/dt + div(phi, T) - laplacian(D.T, T)`
    fn temperature_eqn(&self) -> FvMatrix<Scalar> {
        let t = self.scalar("T");
        let mut eqn = fvm::ddt(t, &self.mesh, &self.time).unwrap();
        let div = fvm::div(self.flux(), t, ConvectionScheme::Upwind, &self.mesh).unwrap();
        let mut lap = fvm::laplacian(self.scalar("D.T"), t, &self.mesh).unwrap();
        lap.scale(-1.0);
        eqn.add_matrix(&div).unwrap();
        eqn.add_matrix(&lap).unwrap();
        eqn
    }

    /// `d(U)/dt + div(phi, U)`
    fn momentum_eqn(&self) -> FvMatrix<Vector> {
        let u = self.db.lookup::<Vector>("U").unwrap();
        let mut eqn = fvm::ddt(u, &self.mesh, &self.time).unwrap();
        let div = fvm::div(self.flux(), u, ConvectionScheme::Upwind, &self.mesh).unwrap();
        eqn.add_matrix(&div).unwrap();
        eqn
    }

    fn density_eqn(&self) -> FvMatrix<Scalar> {
        fvm::ddt(self.scalar("rho"), &self.mesh, &self.time).unwrap()
    }
}

fn porosity(fields: &[&str]) -> VolumeFractionSource {
    let dict = OptionDict::new()
        .with("type", "volumeFractionSource")
        .with("phase", "solid")
        .with("fields", fields.to_vec());
    VolumeFractionSource::new("porosity", &dict).unwrap()
}

fn all_finite<T: FieldValue>(m: &FvMatrix<T>) -> bool {
    m.max_abs_coeff().is_finite()
}

#[test]
fn unit_fraction_leaves_every_equation_unchanged() {
    let case = Case::new(vec![1.0; 4]);
    let ctx = case.ctx();
    let option = porosity(&["T", "U", "rho"]);
    let rho = case.scalar("rho");
    let alpha = VolScalarField::uniform("alpha.air", Dimensions::DIMLESS, &case.mesh, 0.7);

    for mode in [
        SupMode::Plain,
        SupMode::Density(rho),
        SupMode::DensityPhase(&alpha, rho),
    ] {
        let before = case.temperature_eqn();
        let mut eqn = before.clone();
        option.add_sup(&ctx, &mut eqn, mode).unwrap();
        assert_eq!(eqn, before, "T in {} mode", mode.label());

        let before = case.momentum_eqn();
        let mut eqn = before.clone();
        option.add_sup(&ctx, &mut eqn, mode).unwrap();
        assert_eq!(eqn, before, "U in {} mode", mode.label());

        let before = case.density_eqn();
        let mut eqn = before.clone();
        option.add_sup(&ctx, &mut eqn, mode).unwrap();
        assert_eq!(eqn, before, "rho in {} mode", mode.label());
    }
    assert_eq!(option.diagnostics().calls, 9);
    assert_eq!(option.diagnostics().degenerate_faces, 0);
}

#[test]
fn single_cell_storage_is_halved() {
    let case = Case::with_flux(vec![0.5], Vector::zeros()).without_diffusion();
    let ctx = case.ctx();
    let option = porosity(&["T"]);
    let rho = VolScalarField::uniform("rho", Dimensions::DENSITY, &case.mesh, 1.0);

    let before = fvm::ddt_rho(&rho, case.scalar("T"), &case.mesh, &case.time).unwrap();
    let mut eqn = before.clone();
    option.add_sup(&ctx, &mut eqn, SupMode::Density(&rho)).unwrap();

    assert_eq!(eqn.diag()[0], 0.5 * before.diag()[0]);
    assert_eq!(eqn.source()[0], 0.5 * before.source()[0]);
    assert_eq!(eqn.source()[0], 145.0);
}

#[test]
fn zero_fraction_cell_drops_its_convection() {
    let case = Case::new(vec![1.0, 0.0, 1.0]);
    let ctx = case.ctx();
    let option = porosity(&["U"]);

    let mut eqn = case.momentum_eqn();
    option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();

    assert!(all_finite(&eqn));
    assert_eq!(eqn.upper(), &[0.0, 0.0]);
    assert_eq!(eqn.lower(), &[0.0, 0.0]);
    // Storage of the blocked cell is removed as well.
    assert_eq!(eqn.diag()[1], 0.0);
    assert_eq!(option.diagnostics().degenerate_faces, 2);
    assert_eq!(option.role("U"), FieldRole::Momentum);
}

#[test]
fn fully_blocked_mesh_is_finite() {
    let case = Case::new(vec![0.0; 3]);
    let ctx = case.ctx();
    let option = porosity(&["T", "U", "rho"]);

    let mut u = case.momentum_eqn();
    option.add_sup(&ctx, &mut u, SupMode::Plain).unwrap();
    assert!(all_finite(&u));
    assert_eq!(u.max_abs_coeff(), 0.0);
    // Two internal and two boundary faces.
    assert_eq!(option.diagnostics().degenerate_faces, 4);

    let mut t = case.temperature_eqn();
    option.add_sup(&ctx, &mut t, SupMode::Plain).unwrap();
    assert!(all_finite(&t));

    let mut rho = case.density_eqn();
    option.add_sup(&ctx, &mut rho, SupMode::Plain).unwrap();
    assert!(all_finite(&rho));
}

#[test]
fn unlisted_field_is_skipped() {
    let case = Case::new(vec![0.3, 0.6]);
    let ctx = case.ctx();
    let option = porosity(&["U"]);

    let before = case.temperature_eqn();
    let mut eqn = before.clone();
    option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();
    assert_eq!(eqn, before);

    // Not even registered.
    let p = FvMatrix::<Scalar>::new("p_rgh", Dimensions::DIMLESS, &case.mesh);
    let mut eqn = p.clone();
    option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();
    assert_eq!(eqn, p);

    let diagnostics = option.diagnostics();
    assert_eq!(diagnostics.skipped, 2);
    assert_eq!(diagnostics.calls, 0);
}

#[test]
fn missing_volume_fraction_leaves_equation_untouched() {
    let case = Case::new(vec![0.5, 0.5]);
    let ctx = case.ctx();
    let dict = OptionDict::new()
        .with("phase", "ice")
        .with("fields", vec!["T"]);
    let option = VolumeFractionSource::new("porosity", &dict).unwrap();

    let before = case.temperature_eqn();
    let mut eqn = before.clone();
    let err = option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("alpha.ice"));
    assert_eq!(eqn, before);
}

#[test]
fn non_scalar_density_is_rejected() {
    let case = Case::new(vec![0.5, 0.5]);
    let ctx = case.ctx();
    let dict = OptionDict::new()
        .with("phase", "solid")
        .with("rho", "U")
        .with("fields", vec!["U"]);
    let option = VolumeFractionSource::new("porosity", &dict).unwrap();
    assert_eq!(option.role("U"), FieldRole::Density);

    let before = case.momentum_eqn();
    let mut eqn = before.clone();
    let err = option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(eqn, before);
    assert_eq!(option.diagnostics().calls, 0);
}

#[test]
fn wrong_flux_dimensions_are_rejected() {
    let mut case = Case::new(vec![0.5, 0.5]);
    case.db
        .insert_surface(SurfaceScalarField::uniform(
            "phiT",
            Dimensions::TEMPERATURE,
            &case.mesh,
            1.0,
        ))
        .unwrap();
    let ctx = case.ctx();
    let dict = OptionDict::new()
        .with("phase", "solid")
        .with("phi", "phiT")
        .with("fields", vec!["T"]);
    let option = VolumeFractionSource::new("porosity", &dict).unwrap();

    let mut eqn = case.temperature_eqn();
    assert!(option.add_sup(&ctx, &mut eqn, SupMode::Plain).is_err());
}

#[test]
fn storage_weights_follow_mode() {
    let case = Case::with_flux(vec![0.5, 0.5], Vector::zeros()).without_diffusion();
    let ctx = case.ctx();
    let option = porosity(&["T", "rho"]);
    let rho = VolScalarField::uniform("rho", Dimensions::DENSITY, &case.mesh, 2.0);
    let alpha = VolScalarField::uniform("alpha.air", Dimensions::DIMLESS, &case.mesh, 0.5);

    let t = FvMatrix::<Scalar>::new("T", Dimensions::TEMPERATURE, &case.mesh);
    let storage = |mode| {
        option
            .correction(&ctx, &t, mode)
            .unwrap()
            .unwrap()
            .matrix
            .diag()[0]
    };
    assert_eq!(storage(SupMode::Plain), -0.5);
    assert_eq!(storage(SupMode::Density(&rho)), -1.0);
    assert_eq!(storage(SupMode::DensityPhase(&alpha, &rho)), -0.5);

    // The density equation is weighted by the phase fraction only.
    let r = FvMatrix::<Scalar>::new("rho", Dimensions::DENSITY, &case.mesh);
    let storage = |mode| {
        option
            .correction(&ctx, &r, mode)
            .unwrap()
            .unwrap()
            .matrix
            .diag()[0]
    };
    assert_eq!(storage(SupMode::Density(&rho)), -0.5);
    assert_eq!(storage(SupMode::DensityPhase(&alpha, &rho)), -0.25);
}

#[test]
fn density_equation_gets_explicit_continuity() {
    let case = Case::new(vec![1.0, 0.5, 1.0]);
    let ctx = case.ctx();
    let option = porosity(&["rho"]);

    let corr = option
        .correction(&ctx, &case.density_eqn(), SupMode::Plain)
        .unwrap()
        .unwrap();
    assert_eq!(corr.role, FieldRole::Density);
    // Uniform flux through a middle cell has no net outflow.
    assert!(corr.matrix.upper().iter().all(|&c| c == 0.0));
    assert_eq!(corr.matrix.diag()[1], -0.5);
    assert_eq!(corr.matrix.source()[1], -0.5 * 1.2);
}

#[test]
fn transverse_anisotropy_has_no_effect_along_x() {
    let mut case = Case::with_flux(vec![0.25, 0.5, 1.0], Vector::zeros());
    let along = VolSymmTensorField::uniform(
        "K",
        Dimensions::DIMLESS,
        &case.mesh,
        SymmTensor::diagonal(1.0, 5.0, 7.0),
    );
    let doubled = VolSymmTensorField::uniform(
        "K2",
        Dimensions::DIMLESS,
        &case.mesh,
        SymmTensor::diagonal(2.0, 5.0, 7.0),
    );
    case.db.insert(along).unwrap();
    case.db.insert(doubled).unwrap();
    let ctx = case.ctx();

    let with = |k: Option<&str>| {
        let mut dict = OptionDict::new()
            .with("phase", "solid")
            .with("fields", vec!["T"]);
        if let Some(k) = k {
            dict.insert("anisotropy", k);
        }
        VolumeFractionSource::new("porosity", &dict)
            .unwrap()
            .correction(&ctx, &case.temperature_eqn(), SupMode::Plain)
            .unwrap()
            .unwrap()
            .matrix
    };

    let isotropic = with(None);
    assert_eq!(with(Some("K")), isotropic);

    let k2 = with(Some("K2"));
    assert!(k2.is_symmetric());
    for (a, b) in k2.upper().iter().zip(isotropic.upper()) {
        assert!((a - 2.0 * b).abs() < 1e-12);
    }
}

#[test]
fn anisotropy_must_be_a_symmetric_tensor() {
    let case = Case::new(vec![0.5, 0.5]);
    let ctx = case.ctx();
    let dict = OptionDict::new()
        .with("phase", "solid")
        .with("anisotropy", "rho")
        .with("fields", vec!["T"]);
    let option = VolumeFractionSource::new("porosity", &dict).unwrap();
    let mut eqn = case.temperature_eqn();
    let err = option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn failed_reread_keeps_settings() {
    let mut option = porosity(&["T"]);
    let before = option.config().clone();

    let bad = OptionDict::new().with("fields", vec!["U"]);
    assert!(option.read(&bad).is_err());
    assert_eq!(option.config(), &before);

    let retyped = OptionDict::new()
        .with("type", "semiImplicitSource")
        .with("phase", "solid");
    assert!(option.read(&retyped).is_err());
    assert_eq!(option.config(), &before);

    let untyped = OptionDict::new()
        .with("phase", "solid")
        .with("fields", vec!["U", "T"]);
    assert!(option.read(&untyped).is_err());
    assert_eq!(option.config(), &before);

    let good = untyped.with("type", "volumeFractionSource");
    option.read(&good).unwrap();
    assert_eq!(option.config().fields, vec!["U", "T"]);
}

#[test]
fn vanishing_fraction_keeps_momentum_finite() {
    for tiny in [1e-300, 1e-310] {
        let case = Case::with_flux(vec![1.0, tiny, 1.0], Vector::x() * 1e10);
        let ctx = case.ctx();
        let option = porosity(&["U"]);
        let mut eqn = case.momentum_eqn();
        option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();

        assert!(all_finite(&eqn), "e = {tiny}: {eqn:?}");
        // Both faces of the middle cell are cancelled.
        assert_eq!(eqn.upper(), &[0.0, 0.0]);
        assert_eq!(option.diagnostics().degenerate_faces, 2);
    }
}

#[test]
fn non_finite_fraction_is_rejected() {
    let mut case = Case::new(vec![1.0, 0.5, 1.0]);
    case.db.replace(VolScalarField::new(
        "alpha.solid",
        Dimensions::DIMLESS,
        vec![1.0, Real::NAN, 1.0],
        vec![PatchValue::ZeroGradient; 2],
    ));
    let ctx = case.ctx();
    let mut eqn = case.momentum_eqn();
    let before = eqn.clone();
    let err = porosity(&["U"])
        .add_sup(&ctx, &mut eqn, SupMode::Plain)
        .unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(eqn, before);
}

fn fraction() -> impl Strategy<Value = Real> {
    prop_oneof![Just(0.0), Just(1.0), Just(1e-300), Just(1e-310), 0.0..=1.0]
}

proptest! {
    #[test]
    fn correction_is_rederived_each_call(e in prop::collection::vec(fraction(), 2..6)) {
        let case = Case::new(e);
        let ctx = case.ctx();
        let option = porosity(&["T", "U"]);

        let t = case.temperature_eqn();
        let first = option.correction(&ctx, &t, SupMode::Plain).unwrap();
        let second = option.correction(&ctx, &t, SupMode::Plain).unwrap();
        prop_assert_eq!(first, second);

        let mut a = case.momentum_eqn();
        let mut b = a.clone();
        option.add_sup(&ctx, &mut a, SupMode::Plain).unwrap();
        option.add_sup(&ctx, &mut b, SupMode::Plain).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn corrected_momentum_is_finite(e in prop::collection::vec(fraction(), 1..6)) {
        let case = Case::new(e.clone());
        let ctx = case.ctx();
        let option = porosity(&["U"]);
        let mut eqn = case.momentum_eqn();
        option.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();
        prop_assert!(all_finite(&eqn));
        let blocked = e.iter().any(|&x| !(1.0 / x).is_finite());
        prop_assert_eq!(option.diagnostics().degenerate_faces > 0, blocked);
    }

    #[test]
    fn diffusion_correction_is_conservative(
        e in prop::collection::vec(0.01..=1.0f64, 5),
        d in prop::collection::vec(0.0..2.0f64, 5),
    ) {
        let mut case = Case::with_flux(e, Vector::zeros());
        case.db.replace(VolScalarField::new(
            "D.T",
            Dimensions::KINEMATIC_DIFFUSIVITY,
            d,
            vec![PatchValue::ZeroGradient; 2],
        ));
        let ctx = case.ctx();
        let corr = porosity(&["T"])
            .correction(&ctx, &case.temperature_eqn(), SupMode::Plain)
            .unwrap()
            .unwrap();
        prop_assert!(corr.matrix.is_symmetric());

        let (e, d) = (case.scalar("alpha.solid"), case.scalar("D.T"));
        for f in 0..case.mesh.n_internal_faces() {
            let fd = face_diffusivity(&One, e, d, &case.mesh, f);
            let expected = -fd.difference() * case.mesh.mag_sf(f) * case.mesh.delta_coeff(f);
            prop_assert!((corr.matrix.upper()[f] - expected).abs() <= 1e-12);
        }
    }
}

#[test]
fn corrections_agree_across_ranks() {
    let case = Case::new(vec![0.2, 0.9, 0.4]);
    let ctx = case.ctx();
    let option = porosity(&["T"]);
    let tol = Tolerances::default();

    // A tensor unknown named T sees the same coefficients as the scalar one.
    let scalar = option
        .correction(&ctx, &case.temperature_eqn(), SupMode::Plain)
        .unwrap()
        .unwrap();
    let mut db = ObjectRegistry::new();
    for name in ["alpha.solid", "D.T"] {
        db.insert(case.scalar(name).clone()).unwrap();
    }
    db.insert_surface(case.flux().clone()).unwrap();
    let mut t = VolSphericalTensorField::uniform(
        "T",
        Dimensions::TEMPERATURE,
        &case.mesh,
        SphericalTensor::new(300.0),
    );
    t.set_patch(0, PatchValue::Fixed(SphericalTensor::new(400.0)));
    db.insert(t).unwrap();
    let ctx = FvContext::new(&case.mesh, &db, &case.schemes, &case.time);
    let eqn = FvMatrix::<SphericalTensor>::new("T", Dimensions::TEMPERATURE, &case.mesh);
    let spherical = option
        .correction(&ctx, &eqn, SupMode::Plain)
        .unwrap()
        .unwrap();

    for (a, b) in scalar.matrix.diag().iter().zip(spherical.matrix.diag()) {
        assert!(nearly_equal(*a, *b, tol));
    }
    assert_eq!(scalar.matrix.upper(), spherical.matrix.upper());
    assert_eq!(scalar.matrix.lower(), spherical.matrix.lower());
}
