use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::config::ScoringConfig;
use super::domain::TargetRole;

/// Role weights rescaled over the roles that actually responded within one pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveRoleWeights {
    weights: BTreeMap<TargetRole, f64>,
}

impl EffectiveRoleWeights {
    /// Zero for roles that did not respond.
    pub fn weight(&self, role: TargetRole) -> f64 {
        self.weights.get(&role).copied().unwrap_or(0.0)
    }

    pub fn roles(&self) -> impl Iterator<Item = TargetRole> + '_ {
        self.weights.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Redistributes nominal role weights proportionally across the responding roles so
/// absent roles neither vanish from nor depress the pillar score.
pub fn normalize_role_weights<I>(roles: I, config: &ScoringConfig) -> EffectiveRoleWeights
where
    I: IntoIterator<Item = TargetRole>,
{
    let present: BTreeSet<TargetRole> = roles.into_iter().collect();
    let total_base: f64 = present
        .iter()
        .map(|role| config.nominal_weight(*role))
        .sum();

    let weights = if total_base > 0.0 {
        present
            .into_iter()
            .map(|role| (role, config.nominal_weight(role) / total_base))
            .collect()
    } else {
        BTreeMap::new()
    };

    EffectiveRoleWeights { weights }
}
