use super::domain::{MaturityLevel, PillarResult};
use super::grading::{maturity_for, round_to};

/// Overall index: mean of the defined pillar finals, rounded to one decimal.
///
/// Unassessed pillars are left out of the mean; with none assessed there is no index.
pub fn compose_index(pillars: &[&PillarResult]) -> Option<(f64, MaturityLevel)> {
    let finals: Vec<f64> = pillars
        .iter()
        .filter_map(|pillar| pillar.final_score)
        .collect();

    if finals.is_empty() {
        return None;
    }

    let mean = finals.iter().sum::<f64>() / finals.len() as f64;
    let index = round_to(mean, 1);
    let maturity = maturity_for(index)?;
    Some((index, maturity))
}
