use std::io::Write;

use serde::Serialize;

use super::engine::MatchResult;

/// Headline numbers for a ranked match list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total: usize,
    pub eligible: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match: Option<BestMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    pub lender_name: String,
    pub policy_name: String,
    pub score: f64,
}

impl MatchSummary {
    /// Expects `results` already ranked; the best match is the first eligible entry.
    pub fn from_results(results: &[MatchResult]) -> Self {
        let eligible = results.iter().filter(|result| result.eligible).count();
        let best_match = results
            .iter()
            .find(|result| result.eligible)
            .map(|result| BestMatch {
                lender_name: result.lender_name.clone(),
                policy_name: result.policy_name.clone(),
                score: result.score,
            });

        Self {
            total: results.len(),
            eligible,
            best_match,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    rank: usize,
    lender_name: &'a str,
    policy_name: &'a str,
    eligible: bool,
    score: f64,
    reasons: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write match report: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush match report: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes ranked results as CSV, one row per policy, reasons joined with `; `.
pub fn write_csv<W: Write>(results: &[MatchResult], writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, result) in results.iter().enumerate() {
        csv_writer.serialize(ReportRow {
            rank: index + 1,
            lender_name: &result.lender_name,
            policy_name: &result.policy_name,
            eligible: result.eligible,
            score: result.score,
            reasons: result.reasons.join("; "),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
