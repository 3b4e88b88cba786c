use std::collections::BTreeSet;

use super::domain::{Pillar, QuestionCode, ScoreScale, ScoringInput};

/// Input rejected before aggregation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("response for {response} is paired with question {question}")]
    QuestionMismatch {
        question: QuestionCode,
        response: QuestionCode,
    },
    #[error("question {code} has invalid weight {weight}")]
    InvalidQuestionWeight { code: QuestionCode, weight: f64 },
    #[error("score {score} for {code} is outside the declared scale {scale}")]
    ScoreOutOfRange {
        code: QuestionCode,
        score: f64,
        scale: ScoreScale,
    },
    #[error("question {0} was answered more than once")]
    DuplicateResponse(QuestionCode),
    #[error("weighted aggregate for the {} pillar is not finite", .pillar.label())]
    NonFiniteAggregate { pillar: Pillar },
}

/// Checks the eligible set; excluded rows are never inspected.
pub(crate) fn validate_eligible(eligible: &[&ScoringInput]) -> Result<(), ScoringError> {
    let mut seen = BTreeSet::new();

    for input in eligible {
        let question = &input.question;
        let response = &input.response;

        if question.code != response.question_code {
            return Err(ScoringError::QuestionMismatch {
                question: question.code.clone(),
                response: response.question_code.clone(),
            });
        }

        if !question.weight.is_finite() || question.weight <= 0.0 {
            return Err(ScoringError::InvalidQuestionWeight {
                code: question.code.clone(),
                weight: question.weight,
            });
        }

        if let Some(score) = response.score {
            if !question.scale.contains(score) {
                return Err(ScoringError::ScoreOutOfRange {
                    code: question.code.clone(),
                    score,
                    scale: question.scale,
                });
            }
        }

        if !seen.insert(&question.code) {
            return Err(ScoringError::DuplicateResponse(question.code.clone()));
        }
    }

    Ok(())
}
