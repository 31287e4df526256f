use std::fmt;

/// Stable handle of a cluster inside a [`ClusterStore`](super::ClusterStore).
///
/// Handles are issued in strictly increasing order, both for fresh singletons
/// and for merge products, so ordering handles orders clusters by the time they
/// came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub(crate) u64);

impl ClusterId {
    /// Raw handle value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A search result with a location, weight 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// `(longitude, latitude)`.
    pub coords: (f64, f64),
    /// External identifier of the result.
    pub key: String,
}

impl Point {
    /// Create a point from longitude, latitude and key.
    pub fn new(longitude: f64, latitude: f64, key: impl Into<String>) -> Self {
        Self {
            coords: (longitude, latitude),
            key: key.into(),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.coords.0.is_finite() && self.coords.1.is_finite()
    }
}

/// A weighted aggregate of one or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    weight: u64,
    centroid: (f64, f64),
    key: Option<String>,
}

impl Cluster {
    pub(crate) fn singleton(point: Point) -> Self {
        Self {
            weight: 1,
            centroid: point.coords,
            key: Some(point.key),
        }
    }

    /// Combine two clusters into their weighted union.
    ///
    /// The centroid is the weighted mean of both parents, so it stays the exact
    /// mean of every absorbed point. A merge product never carries a key.
    pub(crate) fn merged(a: &Cluster, b: &Cluster) -> Self {
        let wa = a.weight as f64;
        let wb = b.weight as f64;
        let w = wa + wb;
        Self {
            weight: a.weight + b.weight,
            centroid: (
                (a.centroid.0 * wa + b.centroid.0 * wb) / w,
                (a.centroid.1 * wa + b.centroid.1 * wb) / w,
            ),
            key: None,
        }
    }

    /// Number of points absorbed.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Weighted mean `(longitude, latitude)`.
    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    /// Centroid longitude.
    pub fn longitude(&self) -> f64 {
        self.centroid.0
    }

    /// Centroid latitude.
    pub fn latitude(&self) -> f64 {
        self.centroid.1
    }

    /// Key of the original point, present only while the cluster is a singleton.
    pub fn representative_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// True while the cluster holds exactly one point.
    pub fn is_singleton(&self) -> bool {
        self.weight == 1
    }
}
