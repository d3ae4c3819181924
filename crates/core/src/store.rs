//! Pluggable key-value persistence.
//!
//! Hosts implement [`KeyValueStore`] on top of whatever storage they have
//! (browser storage, a settings file, a database). The session only ever
//! stores the target's state under the keys below.

use std::collections::HashMap;

use crate::{
    error::{RadarError, Result},
    geodesy::GeoPoint,
    motion::TargetMotion,
};

pub const TARGET_LAT_KEY: &str = "targetLat";
pub const TARGET_LON_KEY: &str = "targetLon";
pub const TARGET_BEARING_KEY: &str = "targetBearing";
pub const TARGET_SPEED_KEY: &str = "targetSpeed";
pub const TARGET_UPDATED_AT_KEY: &str = "targetUpdatedAt";

const ALL_KEYS: [&str; 5] = [
    TARGET_LAT_KEY,
    TARGET_LON_KEY,
    TARGET_BEARING_KEY,
    TARGET_SPEED_KEY,
    TARGET_UPDATED_AT_KEY,
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> std::result::Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

// ============================================================================
// Target Record
// ============================================================================

/// The persisted state of a target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    pub position: GeoPoint,
    pub bearing_deg: f64,
    pub speed_kmh: f64,
    pub updated_at: Option<f64>,
}

impl TargetRecord {
    pub fn from_motion(target: &TargetMotion) -> Self {
        Self {
            position: target.position(),
            bearing_deg: target.bearing_deg(),
            speed_kmh: target.speed_kmh(),
            updated_at: target.last_update(),
        }
    }

    pub fn into_motion(self) -> Result<TargetMotion> {
        TargetMotion::resume(self.position, self.bearing_deg, self.speed_kmh, self.updated_at)
    }

    /// Read a record back. Returns `None` when no target is stored.
    ///
    /// Records holding only coordinates resume as a stationary target.
    pub fn load(store: &impl KeyValueStore) -> Result<Option<Self>> {
        let Some(latitude) = read_number(store, TARGET_LAT_KEY)? else {
            return Ok(None);
        };
        let Some(longitude) = read_number(store, TARGET_LON_KEY)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            position: GeoPoint::new(latitude, longitude),
            bearing_deg: read_number(store, TARGET_BEARING_KEY)?.unwrap_or(0.0),
            speed_kmh: read_number(store, TARGET_SPEED_KEY)?.unwrap_or(0.0),
            updated_at: read_number(store, TARGET_UPDATED_AT_KEY)?,
        }))
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        store.set(TARGET_LAT_KEY, &self.position.latitude.to_string())?;
        store.set(TARGET_LON_KEY, &self.position.longitude.to_string())?;
        store.set(TARGET_BEARING_KEY, &self.bearing_deg.to_string())?;
        store.set(TARGET_SPEED_KEY, &self.speed_kmh.to_string())?;

        match self.updated_at {
            Some(ts) => store.set(TARGET_UPDATED_AT_KEY, &ts.to_string())?,
            None => store.remove(TARGET_UPDATED_AT_KEY)?,
        }

        Ok(())
    }

    pub fn clear(store: &mut impl KeyValueStore) -> Result<()> {
        for key in ALL_KEYS {
            store.remove(key)?;
        }

        Ok(())
    }
}

fn read_number(store: &impl KeyValueStore, key: &'static str) -> Result<Option<f64>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(RadarError::CorruptRecord { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TargetRecord {
        TargetRecord {
            position: GeoPoint::new(40.0012, -74.9987),
            bearing_deg: 212.5,
            speed_kmh: 1.25,
            updated_at: Some(1_700_000_000.5),
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_record_save_and_load() {
        let mut store = MemoryStore::new();
        record().save(&mut store).unwrap();

        assert_eq!(store.get(TARGET_LAT_KEY).unwrap().as_deref(), Some("40.0012"));
        assert_eq!(TargetRecord::load(&store).unwrap(), Some(record()));
    }

    #[test]
    fn test_load_empty_store() {
        assert_eq!(TargetRecord::load(&MemoryStore::new()).unwrap(), None);
    }

    #[test]
    fn test_coordinates_only_record_is_stationary() {
        let mut store = MemoryStore::new();
        store.set(TARGET_LAT_KEY, "51.5").unwrap();
        store.set(TARGET_LON_KEY, "-0.12").unwrap();

        let loaded = TargetRecord::load(&store).unwrap().unwrap();
        assert_eq!(loaded.position, GeoPoint::new(51.5, -0.12));
        assert_eq!(loaded.speed_kmh, 0.0);
        assert_eq!(loaded.updated_at, None);
    }

    #[test]
    fn test_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set(TARGET_LAT_KEY, "north").unwrap();
        store.set(TARGET_LON_KEY, "-0.12").unwrap();

        assert!(matches!(
            TargetRecord::load(&store),
            Err(RadarError::CorruptRecord { key: TARGET_LAT_KEY, .. })
        ));
    }

    #[test]
    fn test_clear_removes_every_key() {
        let mut store = MemoryStore::new();
        record().save(&mut store).unwrap();
        store.set("unrelated", "kept").unwrap();

        TargetRecord::clear(&mut store).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(TargetRecord::load(&store).unwrap(), None);
    }

    #[test]
    fn test_record_round_trips_through_motion() {
        let motion = record().into_motion().unwrap();
        assert_eq!(TargetRecord::from_motion(&motion), record());
    }
}
