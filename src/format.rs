//! Rendering clusters as map pins.
//!
//! Both shapes carry the same records and differ only in container layout:
//!
//! - [`PinList`]: ordered records under a repeated `"pin"` name, fields in
//!   `type, size, longitude, latitude, reference` order. Serialized as a flat
//!   named list, `["pin", {..}, "pin", {..}]`, since JSON objects cannot repeat
//!   a key.
//! - [`CompactPins`]: a plain array of objects with lexicographically sorted keys.
//!
//! `reference` is only present on singletons.

use std::collections::BTreeMap;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::cluster::Cluster;
use crate::request::OutputShape;

const KEY_PIN: &str = "pin";
const KEY_TYPE: &str = "type";
const KEY_SIZE: &str = "size";
const KEY_LONGITUDE: &str = "longitude";
const KEY_LATITUDE: &str = "latitude";
const KEY_REFERENCE: &str = "reference";

/// Whether a pin stands for one result or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Single,
    Cluster,
}

impl PinType {
    pub fn as_str(self) -> &'static str {
        match self {
            PinType::Single => "single",
            PinType::Cluster => "cluster",
        }
    }
}

/// One output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    #[serde(rename = "type")]
    pub kind: PinType,
    pub size: u64,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl From<&Cluster> for Pin {
    fn from(cluster: &Cluster) -> Self {
        let kind = if cluster.weight() == 1 {
            PinType::Single
        } else {
            PinType::Cluster
        };
        Self {
            kind,
            size: cluster.weight(),
            longitude: cluster.longitude(),
            latitude: cluster.latitude(),
            reference: match kind {
                PinType::Single => cluster.representative_key().map(str::to_owned),
                PinType::Cluster => None,
            },
        }
    }
}

impl Pin {
    /// The record as a key-sorted map.
    pub fn to_sorted_map(&self) -> BTreeMap<&'static str, Value> {
        let mut map = BTreeMap::new();
        map.insert(KEY_TYPE, Value::from(self.kind.as_str()));
        map.insert(KEY_SIZE, Value::from(self.size));
        map.insert(KEY_LONGITUDE, Value::from(self.longitude));
        map.insert(KEY_LATITUDE, Value::from(self.latitude));
        if let Some(reference) = &self.reference {
            map.insert(KEY_REFERENCE, Value::from(reference.as_str()));
        }
        map
    }
}

/// Ordered pins, one repeated `"pin"` entry each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinList {
    pins: Vec<Pin>,
}

impl PinList {
    /// `(name, record)` entries in emission order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Pin)> + '_ {
        self.pins.iter().map(|p| (KEY_PIN, p))
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Sum of all pin sizes.
    pub fn total_size(&self) -> u64 {
        self.pins.iter().map(|p| p.size).sum()
    }
}

impl Serialize for PinList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2 * self.pins.len()))?;
        for (name, pin) in self.entries() {
            seq.serialize_element(name)?;
            seq.serialize_element(pin)?;
        }
        seq.end()
    }
}

/// Flat list of key-sorted records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompactPins(pub Vec<BTreeMap<&'static str, Value>>);

/// Rendered output in the requested shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClusteringOutput {
    Pins(PinList),
    Compact(CompactPins),
}

impl ClusteringOutput {
    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            ClusteringOutput::Pins(p) => p.len(),
            ClusteringOutput::Compact(c) => c.0.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render clusters as an ordered [`PinList`].
pub fn format_pins(clusters: &[Cluster]) -> PinList {
    PinList {
        pins: clusters.iter().map(Pin::from).collect(),
    }
}

/// Render clusters as [`CompactPins`].
pub fn format_compact(clusters: &[Cluster]) -> CompactPins {
    CompactPins(
        clusters
            .iter()
            .map(|c| Pin::from(c).to_sorted_map())
            .collect(),
    )
}

/// Render clusters in `shape`.
pub fn render(clusters: &[Cluster], shape: OutputShape) -> ClusteringOutput {
    match shape {
        OutputShape::Pins => ClusteringOutput::Pins(format_pins(clusters)),
        OutputShape::Compact => ClusteringOutput::Compact(format_compact(clusters)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{cluster_points, Point};

    fn sample() -> Vec<Cluster> {
        cluster_points(
            vec![
                Point::new(1.5, 2.5, "a"),
                Point::new(10.0, 10.0, "b"),
                Point::new(10.0, 12.0, "c"),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_pin_fields() {
        let pins = format_pins(&sample());
        assert_eq!(pins.len(), 2);
        assert_eq!(pins.total_size(), 3);

        let single = &pins.pins()[0];
        assert_eq!(single.kind, PinType::Single);
        assert_eq!(single.size, 1);
        assert_eq!(single.reference.as_deref(), Some("a"));

        let cluster = &pins.pins()[1];
        assert_eq!(cluster.kind, PinType::Cluster);
        assert_eq!(cluster.size, 2);
        assert_eq!((cluster.longitude, cluster.latitude), (10.0, 11.0));
        assert_eq!(cluster.reference, None);
    }

    #[test]
    fn test_pins_json_layout() {
        let json = serde_json::to_string(&format_pins(&sample())).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"["pin",{"type":"single","size":1,"longitude":1.5,"latitude":2.5,"reference":"a"},"#,
                r#""pin",{"type":"cluster","size":2,"longitude":10.0,"latitude":11.0}]"#
            )
        );
    }

    #[test]
    fn test_compact_json_layout() {
        let json = serde_json::to_string(&format_compact(&sample())).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"latitude":2.5,"longitude":1.5,"reference":"a","size":1,"type":"single"},"#,
                r#"{"latitude":11.0,"longitude":10.0,"size":2,"type":"cluster"}]"#
            )
        );
    }

    #[test]
    fn test_shapes_agree() {
        let clusters = sample();
        let ClusteringOutput::Pins(pins) = render(&clusters, OutputShape::Pins) else {
            panic!("expected pins");
        };
        let ClusteringOutput::Compact(compact) = render(&clusters, OutputShape::Compact) else {
            panic!("expected compact");
        };
        for (pin, map) in pins.pins().iter().zip(&compact.0) {
            assert_eq!(&pin.to_sorted_map(), map);
        }
    }

    #[test]
    fn test_empty() {
        assert!(render(&[], OutputShape::Pins).is_empty());
        assert_eq!(serde_json::to_string(&format_pins(&[])).unwrap(), "[]");
        assert_eq!(serde_json::to_string(&format_compact(&[])).unwrap(), "[]");
    }
}
