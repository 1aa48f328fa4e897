use clap::Args;
use lender_match::error::AppError;
use lender_match::matching::{
    materialize, standard_catalog, write_csv, Application, CatalogSeed, MatchResult,
    MatchSummary, MatchingEngine,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// JSON file describing the application to rank
    #[arg(long)]
    pub(crate) application: PathBuf,
    /// JSON catalog of lenders and policies (defaults to the built-in broker programs)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Also write the ranked results as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        application,
        catalog,
        csv,
    } = args;

    let application: Application = read_json(&application)?;
    let seeds = match catalog {
        Some(path) => read_json::<Vec<CatalogSeed>>(&path)?,
        None => standard_catalog(),
    };
    let lenders = materialize(seeds);

    let results = MatchingEngine::default().match_catalog(&application, &lenders)?;
    render_matches(&application, &results);

    if let Some(path) = csv {
        write_csv(&results, File::create(&path)?)?;
        println!("\nCSV report written to {}", path.display());
    }

    Ok(())
}

fn read_json<T>(path: &Path) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn render_matches(application: &Application, results: &[MatchResult]) {
    let summary = MatchSummary::from_results(results);

    println!(
        "Lender matches for {} ({} {}, FICO {})",
        application.business_name,
        application.amount_requested,
        application.equipment_type,
        application.fico_score
    );
    println!(
        "- {} policies evaluated | {} eligible",
        summary.total, summary.eligible
    );
    match &summary.best_match {
        Some(best) => println!(
            "- Best match: {} / {} (score {})",
            best.lender_name, best.policy_name, best.score
        ),
        None => println!("- No eligible policies"),
    }

    println!("\nRanked results:");
    for (index, result) in results.iter().enumerate() {
        let status = if result.eligible {
            "eligible"
        } else {
            "ineligible"
        };
        println!(
            "  {}. {} / {}: {} (score {})",
            index + 1,
            result.lender_name,
            result.policy_name,
            status,
            result.score
        );
        for reason in &result.reasons {
            println!("     - {reason}");
        }
    }
}
