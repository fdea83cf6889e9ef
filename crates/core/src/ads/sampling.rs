//! Result-count policy for ad slots.

use rand::Rng;
use rand::seq::index;

/// Keep at most `limit` items, chosen uniformly at random without replacement.
///
/// A `limit` of zero, or one at least as large as the list, returns every
/// item. Picked items keep their original relative order; which items are
/// picked is the only thing the sample promises.
pub fn sample_limit<T, R>(items: Vec<T>, limit: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if limit == 0 || items.len() <= limit {
        return items;
    }

    let mut keep = vec![false; items.len()];
    for picked in index::sample(rng, items.len(), limit) {
        keep[picked] = true;
    }

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_limit_returns_all() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_limit(vec![1, 2, 3, 4], 0, &mut rng), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_limit_above_count_returns_all() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_limit(vec![1, 2, 3], 3, &mut rng), vec![1, 2, 3]);
        assert_eq!(sample_limit(vec![1, 2, 3], 10, &mut rng), vec![1, 2, 3]);
        assert!(sample_limit(Vec::<u8>::new(), 3, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_size_and_membership() {
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<u32> = (0..20).collect();

        for limit in 1..20 {
            let picked = sample_limit(items.clone(), limit, &mut rng);
            assert_eq!(picked.len(), limit);
            assert!(picked.windows(2).all(|w| w[0] < w[1]), "order kept, no duplicates");
            assert!(picked.iter().all(|p| items.contains(p)));
        }
    }

    #[test]
    fn test_sample_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut hits = [0u32; 5];

        for _ in 0..5_000 {
            for picked in sample_limit(vec![0usize, 1, 2, 3, 4], 2, &mut rng) {
                hits[picked] += 1;
            }
        }

        // Expected 2000 per item.
        for (item, count) in hits.iter().enumerate() {
            assert!((1700..=2300).contains(count), "item {item} picked {count} times");
        }
    }
}
