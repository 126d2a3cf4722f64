use std::path::{Path, PathBuf};

use pf_case::{CaseError, baseline_equation};
use pf_fields::{Scalar, Vector};

fn case_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../cases")
        .join(name)
}

#[test]
fn cases_load_and_validate() {
    for name in ["packed_bed.yaml", "blocked_channel.json"] {
        let case = pf_case::load(&case_path(name))
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let state = case
            .instantiate()
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
        assert!(state.mesh.n_cells() > 0);
        assert_eq!(case.build_options().unwrap().len(), 1);
    }
}

#[test]
fn packed_bed_corrects_listed_fields() {
    let case = pf_case::load_yaml(&case_path("packed_bed.yaml")).unwrap();
    let state = case.instantiate().unwrap();
    let ctx = state.ctx();
    let mode = state.sup_mode().unwrap();
    let mut options = case.build_options().unwrap();

    let before = baseline_equation::<Scalar>(&state, "T").unwrap();
    let mut t = before.clone();
    options.add_sup(&ctx, &mut t, mode).unwrap();
    // Cells 0..3 are open, 3..7 are packed.
    assert_eq!(t.diag()[0], before.diag()[0]);
    assert!(t.diag()[5] < before.diag()[5]);
    assert!(t.max_abs_coeff().is_finite());

    let mut u = baseline_equation::<Vector>(&state, "U").unwrap();
    options.add_sup(&ctx, &mut u, mode).unwrap();
    assert!(u.max_abs_coeff().is_finite());
    assert!(options.check_applied().is_empty());

    let diagnostics = options.diagnostics();
    assert_eq!(diagnostics[0].1.calls, 2);
    assert_eq!(diagnostics[0].1.degenerate_faces, 0);
}

#[test]
fn blocked_channel_reports_degenerate_faces() {
    let case = pf_case::load_json(&case_path("blocked_channel.json")).unwrap();
    let state = case.instantiate().unwrap();
    let ctx = state.ctx();
    let mode = state.sup_mode().unwrap();
    let mut options = case.build_options().unwrap();

    let mut u = baseline_equation::<Vector>(&state, "U").unwrap();
    options.add_sup(&ctx, &mut u, mode).unwrap();
    assert!(u.max_abs_coeff().is_finite());

    let mut rho = baseline_equation::<Scalar>(&state, "rho").unwrap();
    options.add_sup(&ctx, &mut rho, mode).unwrap();
    // Closed cell: no storage left in the density equation.
    assert_eq!(rho.diag()[2], 0.0);
    assert!(rho.source()[2].abs() < 1e-12);
    assert!(rho.diag()[0] > 0.0);

    // The baseline diffuses h with alphaEff, as the correction assumes.
    let base = baseline_equation::<Scalar>(&state, "h").unwrap();
    assert!(base.upper().iter().all(|c| *c < 0.0));
    let mut h = base.clone();
    options.add_sup(&ctx, &mut h, mode).unwrap();
    assert!(h.max_abs_coeff().is_finite());
    assert!(h.diag().iter().all(|c| *c > 0.0), "diag {:?}", h.diag());
    assert!(h.upper().iter().chain(h.lower()).all(|c| *c < 0.0));

    let diagnostics = options.diagnostics();
    assert_eq!(diagnostics[0].1.calls, 3);
    // Both faces of the closed middle cell.
    assert_eq!(diagnostics[0].1.degenerate_faces, 2);
}

#[test]
fn unknown_field_is_a_field_error() {
    let case = pf_case::load_yaml(&case_path("packed_bed.yaml")).unwrap();
    let state = case.instantiate().unwrap();
    let err = baseline_equation::<Scalar>(&state, "k").unwrap_err();
    assert!(matches!(err, CaseError::Field(_)));
    let err = baseline_equation::<Scalar>(&state, "U").unwrap_err();
    assert!(matches!(err, CaseError::Field(_)));
}
