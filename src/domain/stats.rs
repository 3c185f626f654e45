//! Collection statistics for dashboard views.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::rating::round_to_tenth;
use super::wine::{WineRecord, WineType};

/// Summary figures over a whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub total: usize,
    /// Mean rating rounded to one decimal; `None` when empty.
    pub average_rating: Option<f64>,
    /// Bottles per type. Types with no bottles are absent.
    pub type_counts: BTreeMap<WineType, usize>,
    /// Most frequent type; ties go to the earlier type in `WineType::ALL`.
    pub most_common_type: Option<WineType>,
}

impl CollectionStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(wines: &[WineRecord]) -> Self {
        let total = wines.len();

        let average_rating = (total > 0).then(|| {
            let sum: f64 = wines.iter().map(|w| w.rating).sum();
            round_to_tenth(sum / total as f64)
        });

        let mut type_counts = BTreeMap::new();
        for wine in wines {
            *type_counts.entry(wine.wine_type).or_insert(0) += 1;
        }

        let most_common_type = WineType::ALL
            .iter()
            .copied()
            .filter_map(|t| type_counts.get(&t).map(|&n| (t, n)))
            .fold(None, |best: Option<(WineType, usize)>, (t, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((t, n)),
            })
            .map(|(t, _)| t);

        Self {
            total,
            average_rating,
            type_counts,
            most_common_type,
        }
    }

    /// Share of the collection held by `wine_type`, in percent.
    #[allow(clippy::cast_precision_loss)]
    pub fn type_share(&self, wine_type: WineType) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self.type_counts.get(&wine_type).copied().unwrap_or(0);
        count as f64 / self.total as f64 * 100.0
    }
}

/// The `n` best-rated records, highest first. Ties keep collection order.
pub fn top_rated(wines: &[WineRecord], n: usize) -> Vec<&WineRecord> {
    let mut ranked: Vec<&WineRecord> = wines.iter().collect();
    ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}
