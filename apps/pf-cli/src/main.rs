use clap::{Parser, Subcommand};
use pf_case::{CaseResult, CaseState, baseline_equation};
use pf_fields::{AnyVolField, FieldError, Scalar, SphericalTensor, SymmTensor, Tensor, Vector};
use pf_matrix::FvMatrix;
use pf_options::{OptionList, SupField};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "PoreFlow CLI - porosity corrections for finite-volume equations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and structure
    Validate {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// List the options of a case and the fields they correct
    Options {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
    },
    /// Assemble a field's equation, apply the options and summarise the change
    Apply {
        /// Path to the case YAML or JSON file
        case_path: PathBuf,
        /// Field whose equation is assembled
        field: String,
        /// Print coefficients cell by cell
        #[arg(long)]
        cells: bool,
    },
}

fn main() -> CaseResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Options { case_path } => cmd_options(&case_path),
        Commands::Apply {
            case_path,
            field,
            cells,
        } => cmd_apply(&case_path, &field, cells),
    }
}

fn cmd_validate(case_path: &Path) -> CaseResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = pf_case::load(case_path)?;
    case.instantiate()?;
    case.build_options()?;
    println!("✓ Case is valid");
    Ok(())
}

fn cmd_options(case_path: &Path) -> CaseResult<()> {
    let case = pf_case::load(case_path)?;
    let options = case.build_options()?;

    if options.is_empty() {
        println!("No options in case");
    } else {
        println!("Options in case {}:", case.name);
        for option in options.iter() {
            let state = if option.is_active() { "" } else { " (inactive)" };
            println!(
                "  {} - {}{}: {}",
                option.name(),
                option.type_name(),
                state,
                option.field_names().join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_apply(case_path: &Path, field: &str, cells: bool) -> CaseResult<()> {
    let case = pf_case::load(case_path)?;
    let state = case.instantiate()?;
    let mut options = case.build_options()?;

    let psi = state
        .registry
        .vol_fields()
        .find(|f| f.name() == field)
        .ok_or_else(|| FieldError::NotFound {
            name: field.to_string(),
        })?;

    tracing::debug!(case = %case.name, cells = state.mesh.n_cells(), "case instantiated");
    println!(
        "Assembling {} equation for {} ({})",
        state.sup_mode()?.label(),
        field,
        psi.rank()
    );
    match psi {
        AnyVolField::Scalar(_) => apply::<Scalar>(&state, &mut options, field, cells)?,
        AnyVolField::Vector(_) => apply::<Vector>(&state, &mut options, field, cells)?,
        AnyVolField::SymmTensor(_) => apply::<SymmTensor>(&state, &mut options, field, cells)?,
        AnyVolField::SphericalTensor(_) => {
            apply::<SphericalTensor>(&state, &mut options, field, cells)?
        }
        AnyVolField::Tensor(_) => apply::<Tensor>(&state, &mut options, field, cells)?,
    }

    for (name, d) in options.diagnostics() {
        println!(
            "  {}: {} applied, {} skipped, {} degenerate faces",
            name, d.calls, d.skipped, d.degenerate_faces
        );
    }
    Ok(())
}

fn apply<T: SupField>(
    state: &CaseState,
    options: &mut OptionList,
    field: &str,
    cells: bool,
) -> CaseResult<()> {
    let before: FvMatrix<T> = baseline_equation(state, field)?;
    let mut after = before.clone();
    if !options.applies_to(field) {
        println!("  No active option corrects {}", field);
    }
    options.add_sup(&state.ctx(), &mut after, state.sup_mode()?)?;

    print_summary("Baseline", &before);
    print_summary("Corrected", &after);

    if cells {
        println!("  {:>6} {:>14} {:>14} {:>14}", "cell", "diag", "corrected", "ratio");
        for (i, (a, b)) in before.diag().iter().zip(after.diag()).enumerate() {
            let ratio = if *a != 0.0 { b / a } else { f64::NAN };
            println!("  {:>6} {:>14.6e} {:>14.6e} {:>14.4}", i, a, b, ratio);
        }
    }
    Ok(())
}

fn print_summary<T: SupField>(label: &str, m: &FvMatrix<T>) {
    let diag_sum: f64 = m.diag().iter().sum();
    println!(
        "  {:<10} max|coeff| = {:.6e}, sum(diag) = {:.6e}, symmetric = {}",
        label,
        m.max_abs_coeff(),
        diag_sum,
        m.is_symmetric()
    );
}
