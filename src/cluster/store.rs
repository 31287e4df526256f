//! Arena of live clusters addressed by stable handles.
//!
//! Entries are kept sorted by [`ClusterId`]. New handles are always larger than
//! every existing one, so creation and merge both append; only the removal of
//! merged parents shifts entries. Iteration order is therefore creation/merge
//! order, which is also the output order of the engine.

use super::point::{Cluster, ClusterId, Point};
use crate::error::{Error, Result};

/// Owner of every live [`Cluster`].
#[derive(Debug, Clone, Default)]
pub struct ClusterStore {
    entries: Vec<(ClusterId, Cluster)>,
    next_id: u64,
}

impl ClusterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` live clusters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    fn issue_id(&mut self) -> ClusterId {
        let id = ClusterId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: ClusterId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |(h, _)| *h).ok()
    }

    /// Add a singleton cluster for `point`.
    pub fn create(&mut self, point: Point) -> ClusterId {
        let id = self.issue_id();
        self.entries.push((id, Cluster::singleton(point)));
        id
    }

    /// Replace `a` and `b` with their union and return the new handle.
    ///
    /// Both parents are destroyed. Fails if either handle is not live or if
    /// both name the same cluster.
    pub fn merge(&mut self, a: ClusterId, b: ClusterId) -> Result<ClusterId> {
        if a == b {
            return Err(Error::SelfMerge(a));
        }
        let pa = self.position(a).ok_or(Error::UnknownCluster(a))?;
        let pb = self.position(b).ok_or(Error::UnknownCluster(b))?;

        let merged = Cluster::merged(&self.entries[pa].1, &self.entries[pb].1);

        // Remove the later slot first so the earlier index stays valid.
        let (hi, lo) = if pa > pb { (pa, pb) } else { (pb, pa) };
        self.entries.remove(hi);
        self.entries.remove(lo);

        let id = self.issue_id();
        self.entries.push((id, merged));
        Ok(id)
    }

    /// Look up a live cluster.
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.position(id).map(|p| &self.entries[p].1)
    }

    /// Live handles in creation/merge order.
    pub fn handles(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Live clusters with their handles, in creation/merge order.
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> + '_ {
        self.entries.iter().map(|(id, c)| (*id, c))
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all cluster weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c.weight()).sum()
    }

    /// Consume the store, yielding clusters in creation/merge order.
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.entries.into_iter().map(|(_, c)| c).collect()
    }
}
