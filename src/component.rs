//! Query-time pipeline: validate, extract, cluster, render.

use serde_json::{Map, Value};
use tracing::debug;

use crate::cluster::SpatialClusterer;
use crate::config::ClusteringConfig;
use crate::document::{extract_point, FieldSource};
use crate::error::{Error, Result};
use crate::format::{render, ClusteringOutput};
use crate::request::{validate, ClusteringRequest, Validation};

/// Response field carrying the clustering output.
pub const RESPONSE_FIELD: &str = "spatial-clustering";

/// Spatial clustering bound to a fixed [`ClusteringConfig`].
///
/// Stateless across queries: every call to [`process`](Self::process) builds
/// and drops its own engine.
#[derive(Debug, Clone)]
pub struct SpatialClustering {
    config: ClusteringConfig,
}

impl SpatialClustering {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Cluster the candidate set of one query.
    ///
    /// Returns `Ok(None)` when clustering is disabled or there are fewer than
    /// `min_result_count` candidates. Candidates without a usable location are
    /// skipped.
    pub fn process<D: FieldSource>(
        &self,
        request: &ClusteringRequest,
        candidates: &[D],
    ) -> Result<Option<ClusteringOutput>> {
        if !request.enabled {
            return Ok(None);
        }

        let capacity = match validate(
            request.size,
            self.config.max_size(),
            request.min_result_count,
            candidates.len(),
        )? {
            Validation::Skip => {
                debug!(
                    candidates = candidates.len(),
                    min_result_count = request.min_result_count,
                    "too few candidates, skipping spatial clustering"
                );
                return Ok(None);
            }
            Validation::Run { capacity } => capacity,
        };

        let mut engine = SpatialClusterer::new(capacity)?;
        for doc in candidates {
            if let Some(point) = extract_point(doc, &self.config) {
                engine.insert(point)?;
            }
        }

        let dropped = candidates.len() as u64 - engine.inserted();
        debug!(
            candidates = candidates.len(),
            dropped,
            capacity,
            clusters = engine.len(),
            "spatial clustering done"
        );

        let clusters = engine.results();
        Ok(Some(render(&clusters, request.shape)))
    }

    /// Run [`process`](Self::process) and add the output to `response` under
    /// [`RESPONSE_FIELD`].
    ///
    /// The field is left untouched when nothing was produced, and on error.
    pub fn apply<D: FieldSource>(
        &self,
        request: &ClusteringRequest,
        candidates: &[D],
        response: &mut Map<String, Value>,
    ) -> Result<()> {
        if let Some(output) = self.process(request, candidates)? {
            let value =
                serde_json::to_value(&output).map_err(|e| Error::Serialization(e.to_string()))?;
            response.insert(RESPONSE_FIELD.to_owned(), value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::OutputShape;
    use serde_json::json;

    fn component() -> SpatialClustering {
        SpatialClustering::new(
            ClusteringConfig::new("id", "lon", "lat")
                .unwrap()
                .with_max_size(100)
                .unwrap(),
        )
    }

    fn docs(values: Value) -> Vec<Map<String, Value>> {
        match values {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(m) => Some(m),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_disabled() {
        let candidates = docs(json!([{"id": "1", "lon": 1.0, "lat": 2.0}]));
        let request = ClusteringRequest::default();
        assert_eq!(component().process(&request, &candidates), Ok(None));
    }

    #[test]
    fn test_single_document_reference() {
        let candidates = docs(json!([{"id": "1", "lon": "9.25", "lat": "47.5"}]));
        let out = component()
            .process(&ClusteringRequest::new(10), &candidates)
            .unwrap()
            .unwrap();
        let ClusteringOutput::Pins(pins) = out else {
            panic!("expected pins");
        };
        assert_eq!(pins.len(), 1);
        let pin = &pins.pins()[0];
        assert_eq!(pin.reference.as_deref(), Some("1"));
        assert_eq!((pin.longitude, pin.latitude), (9.25, 47.5));
    }

    #[test]
    fn test_apply_inserts_field() {
        let candidates = docs(json!([
            {"id": "a", "lon": 1.0, "lat": 1.0},
            {"id": "b", "lon": 1.0, "lat": 1.5},
            {"id": "c"}
        ]));
        let request = ClusteringRequest::new(1).with_shape(OutputShape::Compact);
        let mut response = Map::new();
        component().apply(&request, &candidates, &mut response).unwrap();
        assert_eq!(
            response[RESPONSE_FIELD],
            json!([{"latitude": 1.25, "longitude": 1.0, "size": 2, "type": "cluster"}])
        );
    }

    #[test]
    fn test_apply_leaves_field_absent() {
        let candidates = docs(json!([{"id": "a", "lon": 1.0, "lat": 1.0}]));
        let mut response = Map::new();

        let request = ClusteringRequest::new(5).with_min_result_count(2);
        component().apply(&request, &candidates, &mut response).unwrap();
        assert!(!response.contains_key(RESPONSE_FIELD));

        let request = ClusteringRequest::new(0);
        assert!(component().apply(&request, &candidates, &mut response).is_err());
        assert!(!response.contains_key(RESPONSE_FIELD));
    }
}
