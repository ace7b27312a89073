//! Seeded sampling that keeps the survivors in their original order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Keep `n` of `items`, chosen with an RNG seeded by `seed`.
///
/// The same `(len, n, seed)` always picks the same positions. When
/// `n >= items.len()` everything is kept.
pub fn sample_in_order<T>(items: Vec<T>, n: usize, seed: u64) -> Vec<T> {
    if n >= items.len() {
        return items;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut keep = vec![false; items.len()];
    for i in index::sample(&mut rng, items.len(), n) {
        keep[i] = true;
    }

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}
