//! Append-only SQLite store for KPI facts.
//!
//! Facts are written once per ingestion run and never updated; reads sum
//! every row ever appended. Every operation opens its own connection, which
//! is closed when it goes out of scope on all paths. With WAL journaling a
//! reader sees either the whole of a committed batch or none of it.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::kpi::{MobilityKpis, NfType, SessionKpis, SliceCounts};

/// Name of the single KPI recorded in the slice table.
pub const SLICE_SESSION_COUNT: &str = "slice_session_count";

/// Fact table owning a batch of counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Mobility,
    Session,
}

impl Partition {
    fn table(self) -> &'static str {
        match self {
            Partition::Mobility => "mobility_kpis",
            Partition::Session => "session_kpis",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KpiStore {
    db_path: PathBuf,
}

impl KpiStore {
    /// Open (creating if needed) the database at `db_path` and ensure the
    /// schema exists.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { db_path };
        let conn = store.connect()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS mobility_kpis (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp  TEXT NOT NULL,
                kpi_name   TEXT NOT NULL CHECK (length(kpi_name) > 0),
                kpi_value  INTEGER NOT NULL CHECK (kpi_value >= 0)
            );
            CREATE TABLE IF NOT EXISTS session_kpis (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp  TEXT NOT NULL,
                kpi_name   TEXT NOT NULL CHECK (length(kpi_name) > 0),
                kpi_value  INTEGER NOT NULL CHECK (kpi_value >= 0)
            );
            CREATE TABLE IF NOT EXISTS slice_kpis (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp  TEXT NOT NULL,
                nf_type    TEXT NOT NULL,
                kpi_name   TEXT NOT NULL,
                kpi_value  INTEGER NOT NULL CHECK (kpi_value >= 0),
                slice      TEXT NOT NULL CHECK (length(slice) > 0)
            );
            "#,
        )?;
        info!(db = %store.db_path.display(), "KPI store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Write one row per `(kpi_name, value)` in a single transaction.
    ///
    /// Either every row commits or none do; on failure the transaction is
    /// rolled back before the error is returned.
    pub fn append<'a, I>(&self, partition: Partition, batch: I, timestamp: DateTime<Utc>) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let ts = format_timestamp(timestamp);
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut written = 0usize;
        {
            let sql = format!(
                "INSERT INTO {} (timestamp, kpi_name, kpi_value) VALUES (?1, ?2, ?3)",
                partition.table()
            );
            let mut stmt = tx.prepare(&sql)?;
            for (kpi_name, value) in batch {
                // Values past i64::MAX go in as -1 and trip the CHECK constraint.
                let value = i64::try_from(value).unwrap_or(-1);
                if let Err(e) = stmt.execute(params![ts, kpi_name, value]) {
                    error!(table = partition.table(), kpi_name, "append failed, rolling back: {}", e);
                    return Err(e.into());
                }
                written += 1;
            }
        }
        tx.commit()?;
        debug!(table = partition.table(), rows = written, "batch appended");
        Ok(written)
    }

    pub fn append_mobility(&self, kpis: &MobilityKpis, timestamp: DateTime<Utc>) -> Result<usize> {
        self.append(Partition::Mobility, kpis.entries(), timestamp)
    }

    pub fn append_session(&self, kpis: &SessionKpis, timestamp: DateTime<Utc>) -> Result<usize> {
        self.append(Partition::Session, kpis.entries(), timestamp)
    }

    /// Write one slice fact per identifier in a single transaction.
    pub fn append_slices(&self, nf: NfType, slices: &SliceCounts, timestamp: DateTime<Utc>) -> Result<usize> {
        let ts = format_timestamp(timestamp);
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO slice_kpis (timestamp, nf_type, kpi_name, kpi_value, slice)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (slice, count) in slices {
                let value = i64::try_from(*count).unwrap_or(-1);
                if let Err(e) = stmt.execute(params![ts, nf.as_str(), SLICE_SESSION_COUNT, value, slice]) {
                    error!(slice = %slice, "slice append failed, rolling back: {}", e);
                    return Err(e.into());
                }
                written += 1;
            }
        }
        tx.commit()?;
        debug!(nf = %nf, rows = written, "slice batch appended");
        Ok(written)
    }

    /// Sum of all recorded values for each distinct `kpi_name` in the partition.
    pub fn sum_by_key(&self, partition: Partition) -> Result<BTreeMap<String, u64>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT kpi_name, SUM(kpi_value) FROM {} GROUP BY kpi_name",
            partition.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let total: i64 = row.get(1)?;
            Ok((name, total.max(0) as u64))
        })?;
        let mut sums = BTreeMap::new();
        for row in rows {
            let (name, total) = row?;
            sums.insert(name, total);
        }
        Ok(sums)
    }

    /// Completed-session totals per slice identifier.
    pub fn sum_by_slice(&self) -> Result<BTreeMap<String, u64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT slice, SUM(kpi_value) FROM slice_kpis WHERE kpi_name = ?1 GROUP BY slice",
        )?;
        let rows = stmt.query_map(params![SLICE_SESSION_COUNT], |row| {
            let slice: String = row.get(0)?;
            let total: i64 = row.get(1)?;
            Ok((slice, total.max(0) as u64))
        })?;
        let mut sums = BTreeMap::new();
        for row in rows {
            let (slice, total) = row?;
            sums.insert(slice, total);
        }
        Ok(sums)
    }

    pub fn mobility_totals(&self) -> Result<MobilityKpis> {
        Ok(MobilityKpis::from_sums(&self.sum_by_key(Partition::Mobility)?))
    }

    pub fn session_totals(&self) -> Result<SessionKpis> {
        Ok(SessionKpis::from_sums(&self.sum_by_key(Partition::Session)?))
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, KpiStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KpiStore::open(dir.path().join("db").join("kpis.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_appends_are_additive() {
        let (_dir, store) = temp_store();
        let now = Utc::now();
        store.append(Partition::Mobility, [("registration_request", 5)], now).unwrap();
        store.append(Partition::Mobility, [("registration_request", 5)], now).unwrap();

        let sums = store.sum_by_key(Partition::Mobility).unwrap();
        assert_eq!(sums.get("registration_request"), Some(&10));
    }

    #[test]
    fn test_partitions_are_isolated() {
        let (_dir, store) = temp_store();
        store.append(Partition::Session, [("pdu_session_est_complete", 3)], Utc::now()).unwrap();

        assert!(store.sum_by_key(Partition::Mobility).unwrap().is_empty());
        assert_eq!(store.session_totals().unwrap().pdu_session_est_complete, 3);
    }

    #[test]
    fn test_failed_append_rolls_back_whole_batch() {
        let (_dir, store) = temp_store();
        store.append(Partition::Mobility, [("registration_request", 5)], Utc::now()).unwrap();
        let before = store.sum_by_key(Partition::Mobility).unwrap();

        // Second row violates the schema after the first has been inserted.
        let err = store
            .append(
                Partition::Mobility,
                [("registration_request", 7), ("", 1)],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, crate::error::KpiError::Storage(_)));

        let after = store.sum_by_key(Partition::Mobility).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_oversized_value_is_rejected() {
        let (_dir, store) = temp_store();
        let err = store.append(Partition::Session, [("policy_association_request", u64::MAX)], Utc::now());
        assert!(err.is_err());
        assert!(store.sum_by_key(Partition::Session).unwrap().is_empty());
    }

    #[test]
    fn test_full_record_writes_every_key() {
        let (_dir, store) = temp_store();
        let kpis = MobilityKpis {
            registration_success: 2,
            ..Default::default()
        };
        assert_eq!(store.append_mobility(&kpis, Utc::now()).unwrap(), 7);

        let sums = store.sum_by_key(Partition::Mobility).unwrap();
        assert_eq!(sums.len(), 7);
        assert_eq!(sums["registration_reject"], 0);
        assert_eq!(store.mobility_totals().unwrap(), kpis);
    }

    #[test]
    fn test_slice_sums_group_by_identifier() {
        let (_dir, store) = temp_store();
        let mut batch = SliceCounts::new();
        batch.insert("1-010203".to_string(), 4);
        batch.insert("2-0a1b2c".to_string(), 1);
        store.append_slices(NfType::Smf, &batch, Utc::now()).unwrap();
        store.append_slices(NfType::Smf, &batch, Utc::now()).unwrap();

        let sums = store.sum_by_slice().unwrap();
        assert_eq!(sums["1-010203"], 8);
        assert_eq!(sums["2-0a1b2c"], 2);
    }

    #[test]
    fn test_reopen_keeps_facts() {
        let (dir, store) = temp_store();
        store.append(Partition::Mobility, [("authentication_retry", 1)], Utc::now()).unwrap();
        drop(store);

        let reopened = KpiStore::open(dir.path().join("db").join("kpis.db")).unwrap();
        assert_eq!(reopened.mobility_totals().unwrap().authentication_retry, 1);
    }
}
