//! Bounded online clustering.
//!
//! # The Algorithm
//!
//! Points arrive one at a time. Each becomes a singleton cluster. As long as
//! there are at most K clusters nothing else happens. The insertion that
//! creates cluster K+1 immediately merges the globally cheapest pair, so the
//! engine never holds more than K clusters between calls.
//!
//! "Cheapest" is Ward's criterion: merging A and B costs the increase in total
//! within-cluster sum of squares,
//!
//! ```text
//! Δ(A,B) = (nₐ × nᵦ)/(nₐ + nᵦ) × ||μₐ - μᵦ||²
//! ```
//!
//! The pair is chosen over *all* live clusters, not only pairs involving the new
//! point: two old clusters may be closer to each other than the newcomer is to
//! anything.
//!
//! ## Complexity
//!
//! - **Time**: O(N·K) for N points, amortized over the cost cache.
//! - **Space**: O(K).
//!
//! The result is a greedy heuristic, not an optimal K-partition, and depends on
//! insertion order. It is fully deterministic for a given sequence.

use tracing::trace;

use super::cost::CostCache;
use super::point::{Cluster, Point};
use super::store::ClusterStore;
use crate::error::{Error, Result};

/// Externally observable fill level of a [`SpatialClusterer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing inserted yet.
    Empty,
    /// Fewer than K clusters.
    Filling,
    /// Exactly K clusters; every further insertion merges.
    AtCapacity,
}

/// Single-pass clusterer holding at most `capacity` clusters.
///
/// Consumed by [`results`](Self::results), so it cannot be fed after it has
/// been drained.
#[derive(Debug, Clone)]
pub struct SpatialClusterer {
    capacity: usize,
    store: ClusterStore,
    costs: CostCache,
    inserted: u64,
}

impl SpatialClusterer {
    /// Create a clusterer that keeps at most `capacity` clusters.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_parameter("size", "size must be at least 1"));
        }
        // One extra slot for the transient K+1-th cluster.
        let slots = capacity.saturating_add(1).min(4096);
        Ok(Self {
            capacity,
            store: ClusterStore::with_capacity(slots),
            costs: CostCache::with_capacity(slots),
            inserted: 0,
        })
    }

    /// Absorb one point.
    pub fn insert(&mut self, point: Point) -> Result<()> {
        if !point.is_finite() {
            return Err(Error::NonFiniteCoordinate { key: point.key });
        }

        let id = self.store.create(point);
        self.costs.insert(&self.store, id)?;
        self.inserted += 1;

        if self.store.len() > self.capacity {
            let (a, b, cost) = self.costs.cheapest().ok_or(Error::CacheOutOfSync)?;
            let merged = self.store.merge(a, b)?;
            self.costs.merge(&self.store, a, b, merged)?;
            trace!(%a, %b, %merged, cost, "merged clusters");
        }

        debug_assert!(self.store.len() <= self.capacity);
        Ok(())
    }

    /// Absorb every point of `points`, stopping at the first error.
    pub fn extend<I>(&mut self, points: I) -> Result<()>
    where
        I: IntoIterator<Item = Point>,
    {
        for point in points {
            self.insert(point)?;
        }
        Ok(())
    }

    /// Current fill level.
    pub fn state(&self) -> EngineState {
        match self.store.len() {
            0 => EngineState::Empty,
            n if n < self.capacity => EngineState::Filling,
            _ => EngineState::AtCapacity,
        }
    }

    /// Maximum number of clusters.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total number of points absorbed so far.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Read-only view of the live clusters.
    pub fn store(&self) -> &ClusterStore {
        &self.store
    }

    /// Drain the clusters in creation/merge order.
    pub fn results(self) -> Vec<Cluster> {
        self.store.into_clusters()
    }
}

/// Cluster `points` into at most `capacity` clusters.
pub fn cluster_points<I>(points: I, capacity: usize) -> Result<Vec<Cluster>>
where
    I: IntoIterator<Item = Point>,
{
    let mut engine = SpatialClusterer::new(capacity)?;
    engine.extend(points)?;
    Ok(engine.results())
}
