use crate::criteria::{
    ADULT, ANAEMIA_CORRECTION, MEDICATION_REVIEW, NUTRITION_OPTIMIZATION, SCREENING_4AT,
    SCREENING_CAM, SCREENING_NU_DESC, SURGICAL_PROCEDURE,
};
use digipod_eval::{Expression, PopulationInterventionPair, Recommendation};

/// Recommendation 4.1: preoperative delirium screening and risk-factor optimisation
///
/// Adult surgical patients should be screened with a validated instrument and
/// have modifiable risk factors addressed. Any one instrument satisfies the
/// screening arm and counts 1 where it was applied; the optimisation arm is
/// met by any of its measures.
pub fn recommendation_4_1() -> Recommendation {
    let population = Expression::and([ADULT.expr(), SURGICAL_PROCEDURE.expr()]);

    let screening = Expression::max_count_or(
        [SCREENING_4AT, SCREENING_CAM, SCREENING_NU_DESC].map(|m| Expression::indicator(m.expr())),
    );
    let optimization = Expression::or([
        MEDICATION_REVIEW.expr(),
        NUTRITION_OPTIMIZATION.expr(),
        ANAEMIA_CORRECTION.expr(),
    ]);

    Recommendation::new(
        "4.1",
        "Preoperative delirium risk screening and risk-factor optimisation",
    )
    .with_pair(PopulationInterventionPair::new(
        "adult surgical patients",
        population,
        Expression::combine_4_1(screening, optimization),
    ))
}
