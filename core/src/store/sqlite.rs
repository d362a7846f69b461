//! SQLite scenario store.
//!
//! RULE: only this file talks to the database.

use super::{normalize_scenario_name, ScenarioStore};
use crate::{
    error::ProjResult,
    inputs::{ProjectionInputs, ScenarioPreset},
    snapshot::{ScenarioSummary, StoredSnapshot},
    types::ScenarioName,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteScenarioStore {
    conn: Connection,
}

impl SqliteScenarioStore {
    /// Open (or create) the scenario database at `path`.
    pub fn open(path: &str) -> ProjResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ProjResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ProjResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_scenarios.sql"))?;
        Ok(())
    }
}

impl ScenarioStore for SqliteScenarioStore {
    fn save(&self, name: &str, inputs: &ProjectionInputs) -> ProjResult<ScenarioName> {
        let name = normalize_scenario_name(name)?;
        let snapshot = StoredSnapshot::capture(inputs)?;
        let inputs_json = serde_json::to_string(&snapshot.inputs)?;

        self.conn.execute(
            "INSERT INTO scenario (scenario_id, name, preset, version, inputs_json, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(name) DO UPDATE SET
                preset      = excluded.preset,
                version     = excluded.version,
                inputs_json = excluded.inputs_json,
                saved_at    = excluded.saved_at",
            params![
                uuid::Uuid::new_v4().to_string(),
                name,
                inputs.scenario.key(),
                snapshot.version,
                inputs_json,
                snapshot.saved_at,
            ],
        )?;

        log::info!("scenario '{name}' saved ({})", inputs.scenario.key());
        Ok(name)
    }

    fn load(&self, name: &str) -> ProjResult<Option<ProjectionInputs>> {
        let name = normalize_scenario_name(name)?;
        let row = self
            .conn
            .query_row(
                "SELECT version, inputs_json, saved_at FROM scenario WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((version, inputs_json, saved_at)) = row else {
            return Ok(None);
        };

        let snapshot = StoredSnapshot {
            version,
            saved_at,
            inputs: serde_json::from_str(&inputs_json)?,
        };
        Ok(Some(snapshot.restore()?))
    }

    fn list(&self) -> ProjResult<Vec<ScenarioSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, preset, saved_at FROM scenario ORDER BY name ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, preset, saved_at)| {
                Ok(ScenarioSummary {
                    name,
                    preset: ScenarioPreset::from_key(&preset)?,
                    saved_at,
                })
            })
            .collect()
    }

    fn delete(&self, name: &str) -> ProjResult<bool> {
        let name = normalize_scenario_name(name)?;
        let removed = self
            .conn
            .execute("DELETE FROM scenario WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }
}
