//! Criterion catalogue
//!
//! Every criterion a recommendation references is declared here once. The
//! key doubles as the result file name (`<key>.json`) the CLI looks up.

use digipod_eval::Expression;
use serde::Serialize;
use std::fmt;

/// Role of a criterion within a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionCategory {
    /// Defines who the recommendation applies to
    Population,
    /// Delirium screening instrument
    Screening,
    /// Preoperative risk-factor optimisation measure
    Optimization,
    /// Component measure of the non-pharmacological bundle
    Bundle,
}

impl fmt::Display for CriterionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CriterionCategory::Population => "population",
            CriterionCategory::Screening => "screening",
            CriterionCategory::Optimization => "optimization",
            CriterionCategory::Bundle => "bundle",
        };
        f.write_str(name)
    }
}

/// A declared criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriterionDeclaration {
    pub key: &'static str,
    pub description: &'static str,
    pub category: CriterionCategory,
}

impl CriterionDeclaration {
    const fn new(key: &'static str, description: &'static str, category: CriterionCategory) -> Self {
        Self {
            key,
            description,
            category,
        }
    }

    /// Leaf expression reading this criterion's result
    pub fn expr(&self) -> Expression {
        Expression::criterion(self.key)
    }
}

// === Population ===
pub const ADULT: CriterionDeclaration =
    CriterionDeclaration::new("adult", "Patient aged 18 years or older", CriterionCategory::Population);
pub const SURGICAL_PROCEDURE: CriterionDeclaration = CriterionDeclaration::new(
    "surgical_procedure",
    "Elective or emergency surgical procedure under anaesthesia",
    CriterionCategory::Population,
);
pub const POSTOPERATIVE_PERIOD: CriterionDeclaration = CriterionDeclaration::new(
    "postoperative_period",
    "Within the postoperative stay following a surgical procedure",
    CriterionCategory::Population,
);

// === Screening ===
pub const SCREENING_4AT: CriterionDeclaration = CriterionDeclaration::new(
    "screening_4at",
    "Delirium screening with the 4 'A's Test (4AT)",
    CriterionCategory::Screening,
);
pub const SCREENING_CAM: CriterionDeclaration = CriterionDeclaration::new(
    "screening_cam",
    "Delirium screening with the Confusion Assessment Method (CAM / CAM-ICU)",
    CriterionCategory::Screening,
);
pub const SCREENING_NU_DESC: CriterionDeclaration = CriterionDeclaration::new(
    "screening_nu_desc",
    "Delirium screening with the Nursing Delirium Screening Scale (Nu-DESC)",
    CriterionCategory::Screening,
);

// === Optimization ===
pub const MEDICATION_REVIEW: CriterionDeclaration = CriterionDeclaration::new(
    "medication_review",
    "Preoperative review of deliriogenic and anticholinergic medication",
    CriterionCategory::Optimization,
);
pub const NUTRITION_OPTIMIZATION: CriterionDeclaration = CriterionDeclaration::new(
    "nutrition_optimization",
    "Preoperative assessment and correction of malnutrition",
    CriterionCategory::Optimization,
);
pub const ANAEMIA_CORRECTION: CriterionDeclaration = CriterionDeclaration::new(
    "anaemia_correction",
    "Preoperative diagnosis and treatment of anaemia",
    CriterionCategory::Optimization,
);

// === Bundle ===
pub const REORIENTATION: CriterionDeclaration = CriterionDeclaration::new(
    "reorientation",
    "Reorientation using clock, calendar and repeated explanation",
    CriterionCategory::Bundle,
);
pub const FAMILY_INVOLVEMENT: CriterionDeclaration = CriterionDeclaration::new(
    "family_involvement",
    "Structured involvement of relatives in orientation",
    CriterionCategory::Bundle,
);
pub const SLEEP_PROTOCOL: CriterionDeclaration = CriterionDeclaration::new(
    "sleep_protocol",
    "Non-pharmacological sleep protocol",
    CriterionCategory::Bundle,
);
pub const NOISE_REDUCTION: CriterionDeclaration = CriterionDeclaration::new(
    "noise_reduction",
    "Night-time noise and light reduction",
    CriterionCategory::Bundle,
);
pub const EARLY_MOBILISATION: CriterionDeclaration = CriterionDeclaration::new(
    "early_mobilisation",
    "Mobilisation on the day of or the day after surgery",
    CriterionCategory::Bundle,
);
pub const PHYSIOTHERAPY: CriterionDeclaration =
    CriterionDeclaration::new("physiotherapy", "Daily physiotherapy session", CriterionCategory::Bundle);
pub const HEARING_AID: CriterionDeclaration =
    CriterionDeclaration::new("hearing_aid", "Hearing aid available and in use", CriterionCategory::Bundle);
pub const GLASSES: CriterionDeclaration =
    CriterionDeclaration::new("glasses", "Glasses available and in use", CriterionCategory::Bundle);

/// All declared criteria
pub const CRITERIA: &[CriterionDeclaration] = &[
    ADULT,
    SURGICAL_PROCEDURE,
    POSTOPERATIVE_PERIOD,
    SCREENING_4AT,
    SCREENING_CAM,
    SCREENING_NU_DESC,
    MEDICATION_REVIEW,
    NUTRITION_OPTIMIZATION,
    ANAEMIA_CORRECTION,
    REORIENTATION,
    FAMILY_INVOLVEMENT,
    SLEEP_PROTOCOL,
    NOISE_REDUCTION,
    EARLY_MOBILISATION,
    PHYSIOTHERAPY,
    HEARING_AID,
    GLASSES,
];

/// Look up a declared criterion by key
pub fn find_criterion(key: &str) -> Option<&'static CriterionDeclaration> {
    CRITERIA.iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = CRITERIA.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), CRITERIA.len());
    }

    #[test]
    fn test_find_criterion() {
        assert_eq!(find_criterion("screening_cam"), Some(&SCREENING_CAM));
        assert_eq!(find_criterion("unknown"), None);
    }
}
