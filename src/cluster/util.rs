use super::point::Cluster;

#[inline]
pub(crate) fn squared_euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Ward-linkage increment of merging `a` and `b`.
///
/// ```text
/// Δ(A,B) = (nₐ × nᵦ)/(nₐ + nᵦ) × ||μₐ - μᵦ||²
/// ```
#[inline]
pub(crate) fn ward_cost(a: &Cluster, b: &Cluster) -> f64 {
    let wa = a.weight() as f64;
    let wb = b.weight() as f64;
    (wa * wb / (wa + wb)) * squared_euclidean(a.centroid(), b.centroid())
}
