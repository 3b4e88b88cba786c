use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::domain::{Pillar, QuestionCode, ScoringInput};
use super::filter::is_eligible;
use super::grading::round_to;
use super::pillar::effective_score;

/// High score that is missing the evidence its question requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceGap {
    pub question_code: QuestionCode,
    pub question_text: String,
    pub pillar: Pillar,
    pub submitted_score: f64,
    pub locked_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_description: Option<String>,
    pub is_draft: bool,
}

/// Worklist of answers that will be capped by the evidence lock unless proof is attached.
///
/// Drafts are listed (and flagged) so auditors can chase evidence before submitting.
pub fn evidence_gaps(inputs: &[ScoringInput], config: &ScoringConfig) -> Vec<EvidenceGap> {
    inputs
        .iter()
        .filter(|input| !input.response.is_na)
        .filter_map(|input| {
            let submitted = input.response.score?;
            let locked = effective_score(
                &input.question,
                submitted,
                input.response.evidence_provided,
                config,
            );
            (locked < submitted).then(|| EvidenceGap {
                question_code: input.question.code.clone(),
                question_text: input.question.text.clone(),
                pillar: input.question.pillar,
                submitted_score: submitted,
                locked_score: locked,
                evidence_description: input.question.evidence_description.clone(),
                is_draft: input.response.is_draft,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub code: QuestionCode,
    pub text: String,
    pub score: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryBreakdown {
    pub subcategory: String,
    pub average_score: f64,
    pub question_count: usize,
    pub questions: Vec<QuestionSummary>,
}

/// Per-pillar, per-subcategory view of the submitted scores used to locate gaps.
pub fn subcategory_breakdown(
    inputs: &[ScoringInput],
) -> BTreeMap<Pillar, Vec<SubcategoryBreakdown>> {
    let mut grouped: BTreeMap<Pillar, BTreeMap<String, Vec<QuestionSummary>>> = BTreeMap::new();

    for input in inputs.iter().filter(|input| is_eligible(input)) {
        let Some(score) = input.response.score else {
            continue;
        };
        grouped
            .entry(input.question.pillar)
            .or_default()
            .entry(input.question.subcategory.clone())
            .or_default()
            .push(QuestionSummary {
                code: input.question.code.clone(),
                text: input.question.text.clone(),
                score,
                is_critical: input.question.is_critical,
            });
    }

    grouped
        .into_iter()
        .map(|(pillar, subcategories)| {
            let rows = subcategories
                .into_iter()
                .map(|(subcategory, questions)| {
                    let total: f64 = questions.iter().map(|question| question.score).sum();
                    SubcategoryBreakdown {
                        subcategory,
                        average_score: round_to(total / questions.len() as f64, 2),
                        question_count: questions.len(),
                        questions,
                    }
                })
                .collect();
            (pillar, rows)
        })
        .collect()
}
