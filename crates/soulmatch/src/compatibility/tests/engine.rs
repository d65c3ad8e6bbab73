use std::sync::Arc;

use super::common::*;
use crate::compatibility::domain::{Gender, PillarToken};
use crate::compatibility::interpretation::{interpret, CompatibilityTier};
use crate::compatibility::scoring::ModelVerdict;
use crate::compatibility::{analyze, finalize_score, CompatibilityEngine};

#[test]
fn reference_couple_scores_sixty() {
    let result = analyze(&reference_groom(), &reference_bride());

    assert_eq!(
        result.pillars_person1,
        PillarToken::from_array([1, 8, 5, 7, 6, 12])
    );
    assert_eq!(
        result.pillars_person2,
        PillarToken::from_array([3, 10, 2, 10, 6, 10])
    );
    assert_eq!(result.sky_score, 0.6);
    assert_eq!(result.earth_score, 0.6);
    assert_eq!(result.trait_penalties_person1.total(), 0.0);
    assert_eq!(result.trait_penalties_person2.total(), 0.0);
    assert_eq!(result.compatibility_score, 60.0);
    assert_eq!(result.tier, CompatibilityTier::Fair);
    assert_eq!(result.interpretation, CompatibilityTier::Fair.narrative());
}

#[test]
fn doubled_void_penalty_lowers_the_score() {
    // 1996-07-15 encodes to [2, 9, 9, 9, 9, 3].
    let groom = birth(1996, 7, 15, 8, Gender::Male);

    let result = analyze(&groom, &reference_bride());

    assert_eq!(result.sky_score, 0.65);
    assert_eq!(result.earth_score, 0.85);
    assert_eq!(result.trait_penalties_person1.slot(0), 16.0);
    assert_eq!(result.compatibility_score, 59.0);
    assert_eq!(result.tier, CompatibilityTier::Average);
}

#[test]
fn six_harm_penalises_both_people() {
    let groom = birth(1990, 1, 8, 6, Gender::Male);
    let bride = birth(1995, 6, 5, 22, Gender::Female);

    let result = analyze(&groom, &bride);

    assert_eq!(result.sky_score, 0.9);
    assert_eq!(result.earth_score, 0.6);
    assert_eq!(result.trait_penalties_person1.slot(1), 7.0);
    assert_eq!(result.trait_penalties_person2.slot(1), 8.2);
    assert_eq!(result.compatibility_score, 59.8);
    assert_eq!(result.tier, CompatibilityTier::Average);
}

#[test]
fn score_is_invariant_under_pair_swap() {
    let births = sample_births();
    for first in births.iter().step_by(11) {
        for second in births.iter().step_by(13) {
            let forward = analyze(first, second);
            let backward = analyze(second, first);

            assert_eq!(forward.compatibility_score, backward.compatibility_score);
            assert_eq!(forward.sky_score, backward.sky_score);
            assert_eq!(forward.earth_score, backward.earth_score);
            assert_eq!(
                forward.trait_penalties_person1,
                backward.trait_penalties_person2
            );
            assert_eq!(
                forward.trait_penalties_person2,
                backward.trait_penalties_person1
            );
        }
    }
}

#[test]
fn scores_stay_within_bounds() {
    let births = sample_births();
    for first in births.iter().step_by(5) {
        for second in births.iter().step_by(9) {
            let result = analyze(first, second);
            assert!(
                (0.0..=100.0).contains(&result.compatibility_score),
                "{} for {first:?} / {second:?}",
                result.compatibility_score
            );
        }
    }
}

#[test]
fn finalize_clamps_and_rounds() {
    assert_eq!(finalize_score(-12.5), 0.0);
    assert_eq!(finalize_score(130.0), 100.0);
    assert_eq!(finalize_score(64.996), 65.0);
    assert_eq!(finalize_score(71.8), 71.8);
    assert_eq!(finalize_score(75.0 - 8.0 - 8.2), 58.8);
}

#[test]
fn tier_boundaries_are_inclusive_on_the_lower_bound() {
    assert_eq!(CompatibilityTier::from_score(100.0), CompatibilityTier::Destined);
    assert_eq!(CompatibilityTier::from_score(90.0), CompatibilityTier::Destined);
    assert_eq!(CompatibilityTier::from_score(89.99), CompatibilityTier::High);
    assert_eq!(CompatibilityTier::from_score(80.0), CompatibilityTier::High);
    assert_eq!(CompatibilityTier::from_score(70.0), CompatibilityTier::Good);
    assert_eq!(CompatibilityTier::from_score(60.0), CompatibilityTier::Fair);
    assert_eq!(CompatibilityTier::from_score(50.0), CompatibilityTier::Average);
    assert_eq!(
        CompatibilityTier::from_score(49.99),
        CompatibilityTier::Challenging
    );
    assert_eq!(
        CompatibilityTier::from_score(0.0),
        CompatibilityTier::Challenging
    );
    assert_eq!(interpret(90.0), CompatibilityTier::Destined.narrative());
    assert_ne!(interpret(89.99), interpret(90.0));
}

#[test]
fn confident_model_overrides_the_tables() {
    let engine = CompatibilityEngine::default()
        .with_model(Arc::new(FixedModel(ModelVerdict::Confident(0.5))));

    let result = engine.analyze(&reference_groom(), &reference_bride());

    assert_eq!(result.sky_score, 0.5);
    assert_eq!(result.earth_score, 0.5);
    assert_eq!(result.compatibility_score, 50.0);
    assert_eq!(result.tier, CompatibilityTier::Average);
}

#[test]
fn untrained_model_falls_back_to_the_tables() {
    let engine =
        CompatibilityEngine::default().with_model(Arc::new(FixedModel(ModelVerdict::Untrained)));

    let with_model = engine.analyze(&reference_groom(), &reference_bride());
    let tables_only = analyze(&reference_groom(), &reference_bride());

    assert_eq!(with_model, tables_only);
}

#[test]
fn confident_verdicts_outside_the_band_fall_back_to_the_tables() {
    let tables_only = analyze(&reference_groom(), &reference_bride());

    for raw in [f64::NAN, 1.7, f64::INFINITY, 0.0] {
        let engine = CompatibilityEngine::default()
            .with_model(Arc::new(FixedModel(ModelVerdict::Confident(raw))));

        let result = engine.analyze(&reference_groom(), &reference_bride());

        assert_eq!(result, tables_only, "verdict {raw} should be ignored");
        assert_eq!(result.sky_score, 0.6);
        assert_eq!(result.earth_score, 0.6);
        assert_eq!(result.compatibility_score, 60.0);
    }
}

#[test]
fn engine_can_be_shared_across_threads() {
    let engine = Arc::new(CompatibilityEngine::default());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                engine
                    .analyze(&reference_groom(), &reference_bride())
                    .compatibility_score
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), 60.0);
    }
}
