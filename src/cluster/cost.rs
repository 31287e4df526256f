//! Pairwise merge-cost index over a [`ClusterStore`].
//!
//! Rather than a full K×K matrix, every live cluster remembers its cheapest
//! merge partner and that cost. The cheapest pair overall is then the minimum
//! over K cached entries.
//!
//! Maintenance per insertion is O(K):
//! - a new cluster is priced against every live cluster, and each of those
//!   adopts it as partner if it is strictly cheaper than the cached one;
//! - after a merge, entries of the two parents are evicted and only the
//!   clusters whose cached partner was a parent are rescanned.
//!
//! Entries of unaffected clusters stay exact: their partner is still live, its
//! cost did not change, and the one new candidate was offered to them.
//!
//! A rescan can stop early. Merging the globally cheapest pair never lowers a
//! Ward cost, so the old cached cost of a stale cluster bounds its new minimum
//! from below. Every surviving partner already cost at least that much; the
//! first one, in handle order, that costs no more than the bound is the
//! answer among them. Only the merge product is priced separately. With many
//! equal costs (repeated coordinates) a rescan is O(1).
//!
//! Ties are resolved toward lower handles everywhere, which makes
//! [`CostCache::cheapest_pair`] return the lexicographically lowest
//! `(low, high)` pair among all pairs of minimum cost.

use std::cmp::Ordering;

use super::point::{Cluster, ClusterId};
use super::store::ClusterStore;
use super::util::ward_cost;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Neighbor {
    id: ClusterId,
    cost: f64,
}

/// Cheapest-partner cache, kept in lockstep with a [`ClusterStore`].
///
/// Every store mutation must be mirrored here: [`insert`](Self::insert) after
/// [`ClusterStore::create`], [`merge`](Self::merge) after [`ClusterStore::merge`].
#[derive(Debug, Clone, Default)]
pub struct CostCache {
    nearest: Vec<(ClusterId, Option<Neighbor>)>,
    evaluations: u64,
}

impl CostCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with room for `capacity` clusters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nearest: Vec::with_capacity(capacity),
            evaluations: 0,
        }
    }

    /// Number of tracked clusters.
    pub fn len(&self) -> usize {
        self.nearest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nearest.is_empty()
    }

    /// Merge costs computed while maintaining the cache.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Ward-linkage cost of merging two live clusters.
    pub fn cost(&self, store: &ClusterStore, a: ClusterId, b: ClusterId) -> Result<f64> {
        let ca = store.get(a).ok_or(Error::UnknownCluster(a))?;
        let cb = store.get(b).ok_or(Error::UnknownCluster(b))?;
        Ok(ward_cost(ca, cb))
    }

    /// Register the newest cluster `id` of `store`.
    pub fn insert(&mut self, store: &ClusterStore, id: ClusterId) -> Result<()> {
        if store.len() != self.nearest.len() + 1 {
            return Err(Error::CacheOutOfSync);
        }
        if self.nearest.last().is_some_and(|(last, _)| *last >= id) {
            return Err(Error::CacheOutOfSync);
        }
        let cluster = store.get(id).ok_or(Error::UnknownCluster(id))?;

        let mut best: Option<Neighbor> = None;
        let others = store.iter().filter(|(h, _)| *h != id);
        for ((h, slot), (other_id, other)) in self.nearest.iter_mut().zip(others) {
            if *h != other_id {
                return Err(Error::CacheOutOfSync);
            }
            let cost = ward_cost(cluster, other);

            // Scanning in handle order with a strict comparison keeps the lowest handle on ties.
            if best.map_or(true, |n| cost < n.cost) {
                best = Some(Neighbor { id: *h, cost });
            }
            // `id` is the highest handle, so it only wins on a strictly lower cost.
            if slot.map_or(true, |n| cost < n.cost) {
                *slot = Some(Neighbor { id, cost });
            }
        }

        self.evaluations += self.nearest.len() as u64;
        self.nearest.push((id, best));
        Ok(())
    }

    /// Mirror a store merge of `a` and `b` into `merged`.
    ///
    /// `a` and `b` must be the pair returned by [`cheapest_pair`](Self::cheapest_pair).
    pub fn merge(
        &mut self,
        store: &ClusterStore,
        a: ClusterId,
        b: ClusterId,
        merged: ClusterId,
    ) -> Result<()> {
        self.evict(a)?;
        self.evict(b)?;

        // Stale entries keep their old cost as a lower bound for the rescan.
        let mut stale = Vec::new();
        for (h, slot) in self.nearest.iter() {
            if let Some(n) = slot.filter(|n| n.id == a || n.id == b) {
                stale.push((*h, n.cost));
            }
        }

        self.insert(store, merged)?;

        let product = store.get(merged).ok_or(Error::UnknownCluster(merged))?;
        for (h, bound) in stale {
            self.rescan(store, h, bound, merged, product)?;
        }
        Ok(())
    }

    /// Pair with the globally minimum merge cost, lower handle first.
    ///
    /// `None` while fewer than two clusters are tracked.
    pub fn cheapest_pair(&self) -> Option<(ClusterId, ClusterId)> {
        self.cheapest().map(|(a, b, _)| (a, b))
    }

    /// Like [`cheapest_pair`](Self::cheapest_pair), including the cost.
    pub fn cheapest(&self) -> Option<(ClusterId, ClusterId, f64)> {
        let mut best: Option<(ClusterId, ClusterId, f64)> = None;
        for (h, slot) in &self.nearest {
            let Some(n) = slot else { continue };
            let pair = if *h < n.id { (*h, n.id) } else { (n.id, *h) };
            let better = match best {
                None => true,
                Some((lo, hi, cost)) => match n.cost.total_cmp(&cost) {
                    Ordering::Less => true,
                    Ordering::Equal => pair < (lo, hi),
                    Ordering::Greater => false,
                },
            };
            if better {
                best = Some((pair.0, pair.1, n.cost));
            }
        }
        best
    }

    fn evict(&mut self, id: ClusterId) -> Result<()> {
        let pos = self
            .nearest
            .binary_search_by_key(&id, |(h, _)| *h)
            .map_err(|_| Error::UnknownCluster(id))?;
        self.nearest.remove(pos);
        Ok(())
    }

    /// Recompute the partner of `id`, whose cached partner was merged into `merged`.
    fn rescan(
        &mut self,
        store: &ClusterStore,
        id: ClusterId,
        bound: f64,
        merged: ClusterId,
        product: &Cluster,
    ) -> Result<()> {
        let cluster = store.get(id).ok_or(Error::UnknownCluster(id))?;

        let mut best: Option<Neighbor> = None;
        let mut evaluations = 0;
        for (other_id, other) in store.iter() {
            if other_id == id || other_id == merged {
                continue;
            }
            let cost = ward_cost(cluster, other);
            evaluations += 1;
            if best.map_or(true, |n| cost < n.cost) {
                best = Some(Neighbor { id: other_id, cost });
            }
            if cost <= bound {
                break;
            }
        }

        // The merge product has the highest handle, so it only wins on a strictly lower cost.
        let cost = ward_cost(cluster, product);
        evaluations += 1;
        if best.map_or(true, |n| cost < n.cost) {
            best = Some(Neighbor { id: merged, cost });
        }

        let pos = self
            .nearest
            .binary_search_by_key(&id, |(h, _)| *h)
            .map_err(|_| Error::UnknownCluster(id))?;
        self.nearest[pos].1 = best;
        self.evaluations += evaluations;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Point;

    fn build(points: &[(f64, f64)]) -> (ClusterStore, CostCache, Vec<ClusterId>) {
        let mut store = ClusterStore::new();
        let mut cache = CostCache::new();
        let mut ids = Vec::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            let id = store.create(Point::new(x, y, i.to_string()));
            cache.insert(&store, id).unwrap();
            ids.push(id);
        }
        (store, cache, ids)
    }

    /// Exhaustive reference: minimum cost, ties to the lowest handle pair.
    fn brute_force(store: &ClusterStore) -> Option<(ClusterId, ClusterId, f64)> {
        let live: Vec<_> = store.iter().collect();
        let mut best: Option<(ClusterId, ClusterId, f64)> = None;
        for i in 0..live.len() {
            for j in (i + 1)..live.len() {
                let cost = ward_cost(live[i].1, live[j].1);
                if best.map_or(true, |(_, _, c)| cost < c) {
                    best = Some((live[i].0, live[j].0, cost));
                }
            }
        }
        best
    }

    #[test]
    fn test_empty_and_single() {
        let (_, cache, _) = build(&[]);
        assert!(cache.cheapest_pair().is_none());
        let (_, cache, _) = build(&[(1.0, 1.0)]);
        assert!(cache.cheapest_pair().is_none());
    }

    #[test]
    fn test_cheapest_pair_picks_closest() {
        let (store, cache, ids) = build(&[(0.0, 0.0), (10.0, 10.0), (0.5, 0.0), (10.0, 12.0)]);
        assert_eq!(cache.cheapest_pair(), Some((ids[0], ids[2])));
        assert_eq!(cache.cost(&store, ids[0], ids[2]).unwrap(), 0.125);
    }

    #[test]
    fn test_old_pair_can_beat_new_point() {
        // The newest point is far from everything; the cheapest pair is old.
        let (_, cache, ids) = build(&[(0.0, 0.0), (0.1, 0.0), (50.0, 50.0)]);
        assert_eq!(cache.cheapest_pair(), Some((ids[0], ids[1])));
    }

    #[test]
    fn test_ties_break_to_lowest_pair() {
        // Unit square: four sides tie at the same cost.
        let (_, cache, ids) = build(&[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(cache.cheapest_pair(), Some((ids[0], ids[1])));

        // Duplicates tie at zero.
        let (_, cache, ids) = build(&[(5.0, 5.0), (3.0, 3.0), (3.0, 3.0), (5.0, 5.0)]);
        assert_eq!(cache.cheapest_pair(), Some((ids[0], ids[3])));
    }

    #[test]
    fn test_merge_keeps_cache_exact() {
        let points = [
            (0.0, 0.0),
            (0.2, 0.1),
            (4.0, 4.0),
            (4.1, 3.9),
            (9.0, 0.0),
            (0.1, 0.3),
            (8.8, 0.4),
            (4.4, 4.2),
        ];
        let (mut store, mut cache, _) = build(&points);
        while store.len() > 1 {
            let expected = brute_force(&store).unwrap();
            let got = cache.cheapest().unwrap();
            assert_eq!((got.0, got.1), (expected.0, expected.1));
            assert_eq!(got.2, expected.2);

            let merged = store.merge(got.0, got.1).unwrap();
            cache.merge(&store, got.0, got.1, merged).unwrap();
            assert_eq!(cache.len(), store.len());
        }
        assert!(cache.cheapest_pair().is_none());
        assert_eq!(store.total_weight(), points.len() as u64);
    }

    #[test]
    fn test_merge_with_ties_matches_brute_force() {
        // Integer grid with duplicates: many equal costs at every step.
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..4 {
                points.push((i as f64, j as f64));
                if (i + j) % 3 == 0 {
                    points.push((i as f64, j as f64));
                }
            }
        }
        let (mut store, mut cache, _) = build(&points);
        while store.len() > 3 {
            let expected = brute_force(&store).unwrap();
            assert_eq!(cache.cheapest(), Some(expected));

            let merged = store.merge(expected.0, expected.1).unwrap();
            cache.merge(&store, expected.0, expected.1, merged).unwrap();
        }
    }

    #[test]
    fn test_identical_points_rescan_is_cheap() {
        let capacity = 200;
        let n = 2000;
        let mut store = ClusterStore::new();
        let mut cache = CostCache::new();
        for i in 0..n {
            let id = store.create(Point::new(7.0, 46.0, i.to_string()));
            cache.insert(&store, id).unwrap();
            if store.len() > capacity {
                let (a, b) = cache.cheapest_pair().unwrap();
                let merged = store.merge(a, b).unwrap();
                cache.merge(&store, a, b, merged).unwrap();
            }
        }
        assert_eq!(store.len(), capacity);
        // Each insertion prices the new point against every cluster, and the
        // merge product once more. Rescans of stale partners stop at the
        // first zero-cost neighbor instead of walking all clusters.
        let bound = 5 * (capacity as u64) * (n as u64);
        assert!(
            cache.evaluations() < bound,
            "{} evaluations, expected fewer than {bound}",
            cache.evaluations()
        );
    }

    #[test]
    fn test_out_of_sync_insert_is_error() {
        let mut store = ClusterStore::new();
        let mut cache = CostCache::new();
        let a = store.create(Point::new(0.0, 0.0, "a"));
        let b = store.create(Point::new(1.0, 0.0, "b"));
        // `a` was never registered.
        assert_eq!(cache.insert(&store, b), Err(Error::CacheOutOfSync));
        assert!(cache.cost(&store, a, b).is_ok());
    }
}
