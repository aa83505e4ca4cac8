//! Per-status template weights and roulette-wheel selection over them.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{FeedbackType, Status};

pub const DEFAULT_WEIGHT: u32 = 50;
pub const MIN_WEIGHT: u32 = 10;
pub const MAX_WEIGHT: u32 = 100;

/// Rows only ever grow; missing entries read as `DEFAULT_WEIGHT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateWeightTable {
    rows: BTreeMap<Status, Vec<u32>>,
}

impl TemplateWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, status: Status) -> &[u32] {
        self.rows.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight at `index`, or the default when the row is shorter.
    pub fn weight(&self, status: Status, index: usize) -> u32 {
        self.row(status).get(index).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Apply the feedback delta to one weight, padding the row as needed,
    /// and return the new weight.
    pub fn adjust(&mut self, status: Status, index: usize, feedback_type: FeedbackType) -> u32 {
        let row = self.rows.entry(status).or_default();
        if row.len() <= index {
            row.resize(index + 1, DEFAULT_WEIGHT);
        }

        let current = row[index] as i32;
        let updated = (current + feedback_type.weight_delta())
            .clamp(MIN_WEIGHT as i32, MAX_WEIGHT as i32) as u32;
        row[index] = updated;
        updated
    }

    /// Bring every stored weight back inside the allowed range. Used on
    /// values loaded from storage.
    pub fn clamp_all(&mut self) {
        for row in self.rows.values_mut() {
            for weight in row.iter_mut() {
                *weight = (*weight).clamp(MIN_WEIGHT, MAX_WEIGHT);
            }
        }
    }
}

/// Pick an index in `0..count` with probability proportional to `row`,
/// treating missing entries as `DEFAULT_WEIGHT`. Entries past `count` are
/// ignored. Returns 0 when `count` is 0.
pub fn weighted_index<R: Rng + ?Sized>(row: &[u32], count: usize, rng: &mut R) -> usize {
    if count == 0 {
        return 0;
    }

    let padded = || {
        row.iter()
            .copied()
            .chain(std::iter::repeat(DEFAULT_WEIGHT))
            .take(count)
    };

    let total: u64 = padded().map(u64::from).sum();
    if total == 0 {
        return rng.gen_range(0..count);
    }

    let draw = rng.gen_range(0..total);
    let mut cumulative = 0u64;
    for (index, weight) in padded().enumerate() {
        cumulative += u64::from(weight);
        if cumulative > draw {
            return index;
        }
    }

    count - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn helpful_saturates_at_ceiling() {
        let mut table = TemplateWeightTable::new();
        let mut last = 0;
        for _ in 0..6 {
            last = table.adjust(Status::Stable, 2, FeedbackType::Helpful);
        }
        assert_eq!(last, MAX_WEIGHT);
        assert_eq!(table.row(Status::Stable), &[50, 50, 100]);
    }

    #[test]
    fn negative_feedback_stops_at_floor() {
        let mut table = TemplateWeightTable::new();
        for _ in 0..20 {
            table.adjust(Status::Recovery, 0, FeedbackType::Skip);
        }
        assert_eq!(table.weight(Status::Recovery, 0), MIN_WEIGHT);

        for _ in 0..20 {
            table.adjust(Status::Recovery, 1, FeedbackType::Different);
        }
        assert_eq!(table.weight(Status::Recovery, 1), MIN_WEIGHT);
    }

    #[test]
    fn mixed_feedback_stays_in_bounds() {
        let mut table = TemplateWeightTable::new();
        let mut rng = StdRng::seed_from_u64(7);
        let kinds = [FeedbackType::Helpful, FeedbackType::Different, FeedbackType::Skip];
        for _ in 0..2_000 {
            let status = Status::ALL[rng.gen_range(0..Status::ALL.len())];
            let index = rng.gen_range(0..6);
            let kind = kinds[rng.gen_range(0..kinds.len())];
            table.adjust(status, index, kind);
        }

        for status in Status::ALL {
            for weight in table.row(status) {
                assert!((MIN_WEIGHT..=MAX_WEIGHT).contains(weight));
            }
        }
    }

    #[test]
    fn unknown_rows_read_as_default() {
        let table = TemplateWeightTable::new();
        assert!(table.row(Status::Focused).is_empty());
        assert_eq!(table.weight(Status::Focused, 3), DEFAULT_WEIGHT);
    }

    #[test]
    fn sampling_is_proportional() {
        let row = [10, 10, 10, 10, 100];
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| weighted_index(&row, 5, &mut rng) == 4)
            .count();

        let frequency = hits as f64 / trials as f64;
        let expected = 100.0 / 140.0;
        assert!((frequency - expected).abs() < 0.05, "frequency was {frequency}");
    }

    #[test]
    fn sampling_pads_short_rows_and_ignores_extra_entries() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert!(weighted_index(&[], 4, &mut rng) < 4);
            assert!(weighted_index(&[10, 10, 10, 10, 100, 100], 4, &mut rng) < 4);
        }
        assert_eq!(weighted_index(&[100], 0, &mut rng), 0);
    }

    #[test]
    fn same_seed_same_choice() {
        let row = [20, 80, 50];
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let picks_a: Vec<usize> = (0..50).map(|_| weighted_index(&row, 3, &mut a)).collect();
        let picks_b: Vec<usize> = (0..50).map(|_| weighted_index(&row, 3, &mut b)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut table = TemplateWeightTable::new();
        table.adjust(Status::NeedsAdjust, 1, FeedbackType::Helpful);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"needsAdjust":[50,60]}"#);

        let parsed: TemplateWeightTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
