use chrono::Timelike;
use rand::Rng;

use crate::composer::templates::{templates_for, TimeBand};
use crate::learning::weighted_index;
use crate::models::{Status, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSentence {
    pub template_index: usize,
    pub text: String,
}

/// Pick a template for `status` weighted by `weights` and, with probability
/// `greeting_probability` inside a greeting band, prefix a greeting.
pub fn compose<R: Rng + ?Sized>(
    status: Status,
    weights: &[u32],
    now: Timestamp,
    greeting_probability: f64,
    rng: &mut R,
) -> ComposedSentence {
    let templates = templates_for(status);
    let template_index = weighted_index(weights, templates.len(), rng);
    let template = templates[template_index];

    let probability = if greeting_probability.is_nan() {
        0.0
    } else {
        greeting_probability.clamp(0.0, 1.0)
    };

    let text = match TimeBand::from_hour(now.hour()) {
        Some(band) if rng.gen_bool(probability) => {
            format!("{} {}", band.greeting(), template)
        }
        _ => template.to_string(),
    };

    ComposedSentence {
        template_index,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    fn at(hour: u32) -> Timestamp {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 7, 20, hour, 15, 0)
            .unwrap()
    }

    #[test]
    fn outside_bands_text_is_the_template() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let composed = compose(Status::Stable, &[], at(15), 1.0, &mut rng);
            let templates = templates_for(Status::Stable);
            assert_eq!(composed.text, templates[composed.template_index]);
        }
    }

    #[test]
    fn greeting_always_added_when_probability_is_one() {
        let mut rng = StdRng::seed_from_u64(2);
        let composed = compose(Status::Focused, &[], at(7), 1.0, &mut rng);
        assert!(composed.text.starts_with("Good morning. "));
        assert!(composed
            .text
            .ends_with(templates_for(Status::Focused)[composed.template_index]));
    }

    #[test]
    fn greeting_never_added_when_probability_is_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let composed = compose(Status::Recovery, &[], at(23), 0.0, &mut rng);
        assert_eq!(composed.text, templates_for(Status::Recovery)[composed.template_index]);
    }

    #[test]
    fn greeting_appears_about_half_the_time() {
        let mut rng = StdRng::seed_from_u64(4);
        let trials = 4_000;
        let greeted = (0..trials)
            .filter(|_| {
                compose(Status::Stable, &[], at(12), 0.5, &mut rng)
                    .text
                    .starts_with("Around lunchtime.")
            })
            .count();
        let ratio = greeted as f64 / trials as f64;
        assert!((ratio - 0.5).abs() < 0.05, "ratio was {ratio}");
    }

    #[test]
    fn index_never_exceeds_template_list() {
        let mut rng = StdRng::seed_from_u64(5);
        let long_row = vec![100; 12];
        for status in Status::ALL {
            for _ in 0..200 {
                let composed = compose(status, &long_row, at(11), 0.5, &mut rng);
                assert!(composed.template_index < templates_for(status).len());
            }
        }
    }

    #[test]
    fn heavy_weight_dominates_selection() {
        let mut rng = StdRng::seed_from_u64(6);
        let weights = [10, 10, 10, 100];
        let trials = 5_000;
        let hits = (0..trials)
            .filter(|_| compose(Status::Focused, &weights, at(15), 0.0, &mut rng).template_index == 3)
            .count();
        let expected = 100.0 / 130.0;
        assert!((hits as f64 / trials as f64 - expected).abs() < 0.05);
    }
}
