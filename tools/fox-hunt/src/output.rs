use anyhow::{Context, Result};
use fox_hunt_core::{destination_point, GeoPoint, PingView, SessionSnapshot};
use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::path::Path;

/// Vertices used to approximate a ping circle
const CIRCLE_SEGMENTS: usize = 64;

/// Approximate a ping's range circle as a closed polygon
pub fn ping_circle(center: GeoPoint, radius_m: f64) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let bearing = 360.0 * i as f64 / CIRCLE_SEGMENTS as f64;
            let p = destination_point(center, bearing, radius_m);
            Coord {
                x: p.longitude,
                y: p.latitude,
            }
        })
        .collect();
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}

/// Convert a geo Polygon to GeoJSON Value
fn polygon_to_geojson(poly: &Polygon<f64>) -> Value {
    let exterior: Vec<Vec<f64>> = poly
        .exterior()
        .0
        .iter()
        .map(|c| vec![c.x, c.y])
        .collect();

    Value::Polygon(vec![exterior])
}

fn feature(value: Value, properties: serde_json::Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn ping_to_feature(view: &PingView, index: usize) -> Feature {
    let circle = ping_circle(view.ping.origin(), view.ping.radius_m);

    let mut properties = serde_json::Map::new();
    properties.insert("feature_type".to_string(), serde_json::json!("ping"));
    properties.insert("index".to_string(), serde_json::json!(index));
    properties.insert("radius_m".to_string(), serde_json::json!(view.ping.radius_m));
    properties.insert("timestamp".to_string(), serde_json::json!(view.ping.timestamp));
    properties.insert("opacity".to_string(), serde_json::json!(view.opacity));

    feature(polygon_to_geojson(&circle), properties)
}

fn target_path_to_feature(path: &[GeoPoint]) -> Feature {
    let line: Vec<Vec<f64>> = path.iter().map(|p| vec![p.longitude, p.latitude]).collect();

    let mut properties = serde_json::Map::new();
    properties.insert("feature_type".to_string(), serde_json::json!("target_path"));
    properties.insert("fix_count".to_string(), serde_json::json!(path.len()));

    feature(Value::LineString(line), properties)
}

fn capture_to_feature(position: GeoPoint) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("feature_type".to_string(), serde_json::json!("capture"));

    feature(
        Value::Point(vec![position.longitude, position.latitude]),
        properties,
    )
}

/// Build the replay layers: one circle per ping, the target's hidden path,
/// and the capture point when the hunt ended in a win.
pub fn replay_collection(
    snapshot: &SessionSnapshot,
    target_path: &[GeoPoint],
    capture: Option<GeoPoint>,
) -> FeatureCollection {
    let mut features: Vec<Feature> = snapshot
        .pings
        .iter()
        .enumerate()
        .map(|(i, view)| ping_to_feature(view, i))
        .collect();

    if target_path.len() > 1 {
        features.push(target_path_to_feature(target_path));
    }

    if let Some(position) = capture {
        features.push(capture_to_feature(position));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write a replay to a GeoJSON file
pub fn write_replay_geojson(
    snapshot: &SessionSnapshot,
    target_path: &[GeoPoint],
    capture: Option<GeoPoint>,
    output_path: &Path,
) -> Result<()> {
    log::info!(
        "Writing {} pings to {}",
        snapshot.pings.len(),
        output_path.display()
    );

    let geojson = GeoJson::from(replay_collection(snapshot, target_path, capture));
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fox_hunt_core::{distance_meters, MemoryStore, RadarSession, TargetRecord};

    fn snapshot_with_pings() -> SessionSnapshot {
        let mut session = RadarSession::new(MemoryStore::new());
        session
            .resume_from(TargetRecord {
                position: GeoPoint::new(40.01, -75.0),
                bearing_deg: 0.0,
                speed_kmh: 0.0,
                updated_at: None,
            })
            .unwrap();

        for (i, lon) in [-75.0, -74.99].into_iter().enumerate() {
            session.update_player_position(GeoPoint::new(40.0, lon));
            session.fire_ping(i as f64 * 60.0).unwrap();
        }

        session.snapshot()
    }

    #[test]
    fn test_ping_circle_radius() {
        let center = GeoPoint::new(40.0, -75.0);
        let circle = ping_circle(center, 300.0);
        let ring = &circle.exterior().0;

        assert_eq!(ring.len(), CIRCLE_SEGMENTS + 1);
        assert_eq!(ring.first(), ring.last());

        for c in ring {
            let d = distance_meters(center, GeoPoint::new(c.y, c.x));
            assert!((d - 300.0).abs() < 3.0, "vertex at {d} m");
        }
    }

    #[test]
    fn test_replay_collection_layers() {
        let snapshot = snapshot_with_pings();
        let path = [GeoPoint::new(40.01, -75.0), GeoPoint::new(40.01, -75.0)];

        let collection = replay_collection(&snapshot, &path, Some(GeoPoint::new(40.01, -75.0)));
        assert_eq!(collection.features.len(), 4);

        let kinds: Vec<&str> = collection
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap()["feature_type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["ping", "ping", "target_path", "capture"]);

        let newest = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(newest["opacity"], serde_json::json!(1.0));

        match &collection.features[0].geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => assert_eq!(rings[0].len(), CIRCLE_SEGMENTS + 1),
            _ => panic!("Expected Polygon value"),
        }
    }

    #[test]
    fn test_single_fix_path_is_skipped() {
        let snapshot = snapshot_with_pings();
        let collection = replay_collection(&snapshot, &[GeoPoint::new(40.0, -75.0)], None);

        assert_eq!(collection.features.len(), 2);
    }
}
