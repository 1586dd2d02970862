use std::cmp::Ordering;

use crate::remap::IdentityMap;

/// Number of entries in the summary block by default.
pub const DEFAULT_TOP_K: usize = 4096;

/// One line of the top-K block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopEntry {
    pub identity: u32,
    pub count: u64,
}

impl TopEntry {
    /// Empirical probability over `total` draws; zero when nothing was drawn.
    pub fn probability(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }
}

/// Most frequent first; equal counts fall back to ascending identity.
fn by_frequency(a: &TopEntry, b: &TopEntry) -> Ordering {
    b.count.cmp(&a.count).then(a.identity.cmp(&b.identity))
}

/// The `min(k, n)` most frequent slots paired with their identities.
///
/// Only the selected head is fully sorted, so the cost is O(n + k log k).
pub fn top_k(counts: &[u64], map: &IdentityMap, k: usize) -> Vec<TopEntry> {
    debug_assert_eq!(counts.len(), map.len());
    let mut entries: Vec<TopEntry> = counts
        .iter()
        .zip(map.as_slice())
        .map(|(&count, &identity)| TopEntry { identity, count })
        .collect();

    let k = k.min(entries.len());
    if k == 0 {
        return Vec::new();
    }
    if k < entries.len() {
        entries.select_nth_unstable_by(k - 1, by_frequency);
        entries.truncate(k);
    }
    entries.sort_unstable_by(by_frequency);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg32;

    fn ids(entries: &[TopEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.identity).collect()
    }

    #[test]
    fn ties_break_by_identity() {
        let mut rng = Pcg32::new(0, 0);
        let mut map = IdentityMap::identity(4).unwrap();
        map.extend_universe(4, &mut rng).unwrap();
        let top = top_k(&[10, 5, 5, 1], &map, 4);
        assert_eq!(ids(&top), vec![0, 1, 2, 3]);
        assert_eq!(
            top.iter().map(|e| e.count).collect::<Vec<_>>(),
            vec![10, 5, 5, 1]
        );
    }

    #[test]
    fn ties_follow_mapped_identity_not_slot() {
        let mut rng = Pcg32::new(42, 54);
        let map = IdentityMap::build(4, 1_000_000, &mut rng).unwrap();
        let top = top_k(&[10, 5, 5, 1], &map, 4);
        let s = map.as_slice();
        assert_eq!(top[0].identity, s[0]);
        assert_eq!(top[1].identity, s[1].min(s[2]));
        assert_eq!(top[2].identity, s[1].max(s[2]));
        assert_eq!(top[3].identity, s[3]);
    }

    #[test]
    fn caps_at_k_and_at_n() {
        let map = IdentityMap::identity(6).unwrap();
        let counts = [3, 9, 0, 7, 9, 1];
        let top = top_k(&counts, &map, 3);
        assert_eq!(ids(&top), vec![1, 4, 3]);

        let all = top_k(&counts, &map, 4096);
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(top_k(&counts, &map, 0).is_empty());
    }

    #[test]
    fn zero_total_gives_zero_probability() {
        let e = TopEntry {
            identity: 1,
            count: 0,
        };
        assert_eq!(e.probability(0), 0.0);
        let e = TopEntry {
            identity: 1,
            count: 250,
        };
        assert_eq!(e.probability(1000), 0.25);
    }
}
