//! Snapshot document codec
//!
//! Encodes snapshots as pretty JSON and decodes any document layout ever
//! written, migrating it step by step to [`SCHEMA_VERSION`].
//!
//! Version history:
//! - **0** (legacy, no `schema_version` key): two top-level documents,
//!   `video_playlists` and `video_playback_state`, each possibly stored as a
//!   JSON string. Playlists keep entries under `items`, entries keep their
//!   media under `video` and their index under `position_in_playlist`, and
//!   history lives inside the playback state as `playback_history`.
//! - **1**: [`Snapshot`] as serialized today.

use crate::error::{Result, StorageError};
use marquee_core::{Snapshot, SCHEMA_VERSION};
use serde_json::{Map, Value};
use tracing::info;

/// Legacy key holding the playlist array
const LEGACY_PLAYLISTS_KEY: &str = "video_playlists";

/// Legacy key holding the playback state
const LEGACY_PLAYBACK_STATE_KEY: &str = "video_playback_state";

type MigrationStep = fn(Value) -> Result<Value>;

/// Ordered migrations: `(from_version, step)` upgrades to `from_version + 1`
const MIGRATIONS: &[(u64, MigrationStep)] = &[(0, legacy_to_v1)];

/// Serialize a snapshot as pretty JSON
pub fn encode(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse a stored document, migrating older layouts
pub fn decode(document: &str) -> Result<Snapshot> {
    let value: Value = serde_json::from_str(document)?;
    decode_value(value)
}

/// Migrate a parsed document to the current schema and deserialize it
pub fn decode_value(mut value: Value) -> Result<Snapshot> {
    let mut version = document_version(&value)?;

    if version > u64::from(SCHEMA_VERSION) {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    while version < u64::from(SCHEMA_VERSION) {
        let step = MIGRATIONS
            .iter()
            .find(|(from, _)| *from == version)
            .map(|(_, step)| step)
            .ok_or_else(|| {
                StorageError::migration(format!("no migration from schema version {}", version))
            })?;

        value = step(value)?;
        version += 1;
        info!(version, "Migrated snapshot document");
    }

    Ok(serde_json::from_value(value)?)
}

fn document_version(value: &Value) -> Result<u64> {
    let object = value
        .as_object()
        .ok_or_else(|| StorageError::migration("snapshot document is not a JSON object"))?;

    match object.get("schema_version") {
        None => Ok(0),
        Some(v) => v.as_u64().ok_or_else(|| {
            StorageError::migration(format!("schema_version is not an unsigned integer: {}", v))
        }),
    }
}

// ===== Version 0 -> 1 =====

fn legacy_to_v1(value: Value) -> Result<Value> {
    let mut legacy = into_object(value, "legacy document")?;

    let playlists = match legacy.remove(LEGACY_PLAYLISTS_KEY) {
        Some(raw) => unwrap_stored_string(raw)?,
        None => Value::Array(Vec::new()),
    };
    let playlists = match playlists {
        Value::Array(items) => items
            .into_iter()
            .map(migrate_legacy_playlist)
            .collect::<Result<Vec<_>>>()?,
        Value::Null => Vec::new(),
        other => {
            return Err(StorageError::migration(format!(
                "{} is not an array: {}",
                LEGACY_PLAYLISTS_KEY, other
            )))
        }
    };

    let mut cursor = match legacy.remove(LEGACY_PLAYBACK_STATE_KEY) {
        Some(raw) => match unwrap_stored_string(raw)? {
            Value::Null => Map::new(),
            state => into_object(state, LEGACY_PLAYBACK_STATE_KEY)?,
        },
        None => Map::new(),
    };
    let history = cursor
        .remove("playback_history")
        .filter(|h| !h.is_null())
        .unwrap_or(Value::Array(Vec::new()));

    // Older builds could persist a negative index
    if let Some(index) = cursor.get("current_item_index") {
        if index.as_u64().is_none() {
            cursor.insert("current_item_index".to_string(), Value::from(0u64));
        }
    }

    let mut migrated = Map::new();
    migrated.insert("schema_version".to_string(), Value::from(1u64));
    migrated.insert("playlists".to_string(), Value::Array(playlists));
    migrated.insert("cursor_state".to_string(), Value::Object(cursor));
    migrated.insert("history".to_string(), history);

    Ok(Value::Object(migrated))
}

fn migrate_legacy_playlist(value: Value) -> Result<Value> {
    let mut playlist = into_object(value, "legacy playlist")?;

    let items = playlist
        .remove("items")
        .unwrap_or(Value::Array(Vec::new()));
    let entries = match items {
        Value::Array(items) => items
            .into_iter()
            .map(migrate_legacy_entry)
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(StorageError::migration(format!(
                "playlist items is not an array: {}",
                other
            )))
        }
    };

    playlist.insert("entries".to_string(), Value::Array(entries));
    Ok(Value::Object(playlist))
}

fn migrate_legacy_entry(value: Value) -> Result<Value> {
    let mut entry = into_object(value, "legacy playlist item")?;

    rename_key(&mut entry, "video", "media");
    rename_key(&mut entry, "position_in_playlist", "position");

    Ok(Value::Object(entry))
}

/// Legacy values were stored as JSON text inside the document
fn unwrap_stored_string(value: Value) -> Result<Value> {
    match value {
        Value::String(text) => Ok(serde_json::from_str(&text)?),
        other => Ok(other),
    }
}

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::migration(format!(
            "{} is not an object: {}",
            what, other
        ))),
    }
}

fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = map.remove(from) {
        map.insert(to.to_string(), value);
    }
}
