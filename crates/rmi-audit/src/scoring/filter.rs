use super::domain::ScoringInput;

/// Responses that take part in scoring: submitted, applicable, and carrying a score.
pub fn eligible_inputs(inputs: &[ScoringInput]) -> Vec<&ScoringInput> {
    inputs.iter().filter(|input| is_eligible(input)).collect()
}

pub(crate) fn is_eligible(input: &ScoringInput) -> bool {
    let response = &input.response;
    !response.is_draft && !response.is_na && response.score.is_some()
}
