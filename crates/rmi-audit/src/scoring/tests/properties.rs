use proptest::prelude::*;

use super::common::*;
use crate::scoring::{
    normalize_role_weights, Pillar, ScoringConfig, ScoringEngine, ScoringInput, TargetRole,
};

fn pillar_strategy() -> impl Strategy<Value = Pillar> {
    prop_oneof![
        Just(Pillar::People),
        Just(Pillar::Process),
        Just(Pillar::Technology),
    ]
}

fn role_strategy() -> impl Strategy<Value = TargetRole> {
    prop_oneof![
        Just(TargetRole::Technician),
        Just(TargetRole::Manager),
        Just(TargetRole::Planner),
        Just(TargetRole::Auditor),
    ]
}

#[derive(Debug, Clone)]
struct Answer {
    pillar: Pillar,
    role: TargetRole,
    weight: f64,
    evidence_required: bool,
    evidence_provided: bool,
    is_critical: bool,
    score: u8,
}

fn answer_strategy() -> impl Strategy<Value = Answer> {
    (
        pillar_strategy(),
        role_strategy(),
        0.1f64..3.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        1u8..=5,
    )
        .prop_map(
            |(pillar, role, weight, evidence_required, evidence_provided, is_critical, score)| {
                Answer {
                    pillar,
                    role,
                    weight,
                    evidence_required,
                    evidence_provided,
                    is_critical,
                    score,
                }
            },
        )
}

fn build_inputs(answers: &[Answer]) -> Vec<ScoringInput> {
    answers
        .iter()
        .enumerate()
        .map(|(idx, answer)| {
            let mut definition = question(&format!("Q-{idx:03}"), answer.pillar, answer.role, answer.weight);
            definition.evidence_required = answer.evidence_required;
            definition.is_critical = answer.is_critical;
            answered(definition, f64::from(answer.score), answer.evidence_provided)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Caps only ever lower a pillar score.
    #[test]
    fn prop_final_never_exceeds_raw(answers in prop::collection::vec(answer_strategy(), 0..24)) {
        let engine = ScoringEngine::standard();
        let result = engine.score(&build_inputs(&answers)).expect("generated inputs are valid");

        for pillar in result.pillars() {
            match (pillar.raw_score, pillar.final_score) {
                (Some(raw), Some(final_score)) => prop_assert!(final_score <= raw),
                (None, None) => prop_assert_eq!(pillar.response_count, 0),
                other => prop_assert!(false, "raw and final disagree on definedness: {:?}", other),
            }
        }
    }

    /// Any critical answer of 1 or 2 bounds the pillar at its tier cap.
    #[test]
    fn prop_critical_failures_bound_the_pillar(answers in prop::collection::vec(answer_strategy(), 1..24)) {
        let engine = ScoringEngine::standard();
        let result = engine.score(&build_inputs(&answers)).expect("generated inputs are valid");

        for answer in answers.iter().filter(|answer| answer.is_critical) {
            let final_score = result.pillar(answer.pillar).final_score.expect("pillar has data");
            match answer.score {
                1 => prop_assert!(final_score <= 2.0),
                2 => prop_assert!(final_score <= 3.0),
                _ => {}
            }
        }
    }

    /// Effective role weights of any present subset sum to one.
    #[test]
    fn prop_role_weights_sum_to_one(roles in prop::collection::vec(role_strategy(), 1..8)) {
        let weights = normalize_role_weights(roles, &ScoringConfig::default());
        prop_assert!((weights.total() - 1.0).abs() < TOLERANCE);
    }

    /// Adding draft or N/A rows never changes the outcome.
    #[test]
    fn prop_excluded_rows_are_inert(
        answers in prop::collection::vec(answer_strategy(), 0..16),
        extras in prop::collection::vec(answer_strategy(), 1..6),
    ) {
        let engine = ScoringEngine::standard();
        let baseline = build_inputs(&answers);
        let mut noisy = baseline.clone();
        for (idx, extra) in extras.iter().enumerate() {
            let definition = question(&format!("X-{idx:03}"), extra.pillar, extra.role, extra.weight);
            if idx % 2 == 0 {
                noisy.push(draft(definition, f64::from(extra.score)));
            } else {
                noisy.push(not_applicable(definition));
            }
        }

        prop_assert_eq!(
            engine.score(&baseline).expect("valid"),
            engine.score(&noisy).expect("valid")
        );
    }

    /// An unevidenced 5 contributes exactly the locked score.
    #[test]
    fn prop_unevidenced_five_counts_as_three(weight in 0.1f64..3.0, role in role_strategy()) {
        let engine = ScoringEngine::standard();
        let mut definition = question("P-01", Pillar::People, role, weight);
        definition.evidence_required = true;
        let result = engine.score(&[answered(definition, 5.0, false)]).expect("valid");

        prop_assert_eq!(result.people.raw_score, Some(3.0));
    }
}
