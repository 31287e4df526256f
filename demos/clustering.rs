//! Folding random search results into map pins.
//!
//! Run with `RUST_LOG=geopin=debug` to see the pipeline decisions.

use geopin::{ClusteringConfig, ClusteringRequest, OutputShape, SpatialClustering};
use rand::prelude::*;
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config: ClusteringConfig = serde_json::from_value(json!({
        "fieldId": "id",
        "fieldLon": "lon",
        "fieldLat": "lat",
        "maxSize": 1000,
    }))
    .unwrap();
    let clustering = SpatialClustering::new(config);

    // Three towns plus scattered results; every tenth result has no location.
    let towns = [(9.37, 47.42), (11.39, 47.26), (16.37, 48.21)];
    let mut rng = StdRng::seed_from_u64(42);
    let docs: Vec<Map<String, Value>> = (0..500)
        .map(|i| {
            let mut doc = Map::new();
            doc.insert("id".into(), json!(format!("doc-{i}")));
            if i % 10 != 0 {
                let (lon, lat) = if i % 50 == 1 {
                    (rng.random_range(9.0..17.0), rng.random_range(46.0..49.0))
                } else {
                    let (lon, lat) = towns[i % towns.len()];
                    (lon + rng.random_range(-0.05..0.05), lat + rng.random_range(-0.05..0.05))
                };
                doc.insert("lon".into(), json!(lon));
                doc.insert("lat".into(), json!(lat));
            }
            doc
        })
        .collect();

    for shape in [OutputShape::Pins, OutputShape::Compact] {
        let request = ClusteringRequest::new(8).with_shape(shape);
        let mut response = Map::new();
        clustering.apply(&request, &docs, &mut response).unwrap();

        println!("=== {shape:?} ===");
        println!("{}", serde_json::to_string_pretty(&Value::Object(response)).unwrap());
    }
}
