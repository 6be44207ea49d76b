use crate::criteria::{
    ADULT, CriterionDeclaration, EARLY_MOBILISATION, FAMILY_INVOLVEMENT, GLASSES, HEARING_AID,
    NOISE_REDUCTION, PHYSIOTHERAPY, POSTOPERATIVE_PERIOD, REORIENTATION, SLEEP_PROTOCOL,
};
use digipod_eval::{Expression, PopulationInterventionPair, Recommendation};

/// Recommendation 4.3: multicomponent non-pharmacological prevention bundle
///
/// Four components (orientation, sleep, mobility, sensory support) weigh
/// equally. Each component counts 1 where any of its alternative measures
/// was delivered.
pub fn recommendation_4_3() -> Recommendation {
    let population = Expression::and([ADULT.expr(), POSTOPERATIVE_PERIOD.expr()]);

    let component = |measures: [&CriterionDeclaration; 2]| {
        Expression::max_count_or(measures.map(|m| Expression::indicator(m.expr())))
    };
    let orientation = component([&REORIENTATION, &FAMILY_INVOLVEMENT]);
    let sleep = component([&SLEEP_PROTOCOL, &NOISE_REDUCTION]);
    let mobility = component([&EARLY_MOBILISATION, &PHYSIOTHERAPY]);
    let sensory = component([&HEARING_AID, &GLASSES]);

    Recommendation::new("4.3", "Multicomponent non-pharmacological delirium prevention")
        .with_pair(PopulationInterventionPair::new(
            "adult postoperative patients",
            population,
            Expression::combine_4_3([orientation, sleep, mobility, sensory]),
        ))
}
