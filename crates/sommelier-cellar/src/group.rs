//! Group aggregation by wine variant and rating band.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::bands::RatingBand;
use crate::load::CleanReview;
use crate::sample::sample_in_order;

/// Groups with fewer reviews are not worth summarizing.
pub const DEFAULT_MIN_REVIEWS: usize = 5;

/// Number of groups summarized per run.
pub const DEFAULT_SAMPLE_GROUPS: usize = 5;

/// Reviews sharing one `(variant, band)` key.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewGroup {
    pub variant: String,
    pub band: RatingBand,
    /// Review texts in input order.
    pub texts: Vec<String>,
    pub avg_points: f64,
    /// Distinct vintages, sorted.
    pub vintages: Vec<String>,
    pub review_count: usize,
}

/// Group reviews by `(variant, band)`, in sorted key order.
pub fn group_reviews(reviews: &[CleanReview]) -> Vec<ReviewGroup> {
    let mut buckets: BTreeMap<(&str, RatingBand), Vec<&CleanReview>> = BTreeMap::new();
    for review in reviews {
        let key = (review.variant.as_str(), RatingBand::from_points(review.points));
        buckets.entry(key).or_default().push(review);
    }

    buckets
        .into_iter()
        .map(|((variant, band), members)| {
            let total: u64 = members.iter().map(|r| u64::from(r.points)).sum();
            let vintages: BTreeSet<&str> = members.iter().map(|r| r.year.as_str()).collect();
            ReviewGroup {
                variant: variant.to_string(),
                band,
                texts: members.iter().map(|r| r.text.clone()).collect(),
                avg_points: total as f64 / members.len() as f64,
                vintages: vintages.into_iter().map(str::to_string).collect(),
                review_count: members.len(),
            }
        })
        .collect()
}

/// Keep groups with at least `min_reviews` reviews.
pub fn filter_min_reviews(groups: Vec<ReviewGroup>, min_reviews: usize) -> Vec<ReviewGroup> {
    let before = groups.len();
    let kept: Vec<ReviewGroup> = groups
        .into_iter()
        .filter(|g| g.review_count >= min_reviews)
        .collect();
    info!(
        "{} of {before} groups have at least {min_reviews} reviews",
        kept.len()
    );
    kept
}

/// Pick `n` groups with a seeded RNG, keeping their order.
pub fn sample_groups(groups: Vec<ReviewGroup>, n: usize, seed: u64) -> Vec<ReviewGroup> {
    sample_in_order(groups, n, seed)
}
