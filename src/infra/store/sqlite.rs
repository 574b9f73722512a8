//! SQLite-backed slot store.
//!
//! One connection guarded by a mutex: every statement, reads included, goes
//! through it, so commits are applied in a single serialized order and no two
//! writers ever race on the database lock file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::core::{
    check_slot_fields, BookingId, BookingRecord, BookingState, ParkingError, Slot, SlotId,
    SlotStatus, SlotStore,
};
use crate::util::clock::now_ms;

const SLOT_COLUMNS: &str = "id, status, occupant_name, booking_id";

/// Durable slot store.
pub struct SqliteSlotStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteSlotStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ParkingError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!("opened slot store at {} (journal_mode={})", path.display(), mode);
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, ParkingError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        })
    }

    /// Backing file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Migration statements for slot and ledger storage.
    pub fn migrations() -> &'static [&'static str] {
        &[r"
CREATE TABLE IF NOT EXISTS slots (
    id INTEGER PRIMARY KEY,
    status TEXT NOT NULL CHECK (status IN ('AVAILABLE', 'OCCUPIED')),
    occupant_name TEXT,
    booking_id TEXT,
    CHECK ((status = 'OCCUPIED') = (booking_id IS NOT NULL))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_slots_booking_id ON slots (booking_id) WHERE booking_id IS NOT NULL;
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    booking_id TEXT NOT NULL,
    slot_id INTEGER NOT NULL REFERENCES slots (id),
    occupant_name TEXT NOT NULL,
    booked_at_ms INTEGER NOT NULL,
    closed_at_ms INTEGER,
    status TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bookings_token_status ON bookings (booking_id, status);
"]
    }

    fn slot_from_row(row: &Row<'_>) -> rusqlite::Result<(SlotId, String, Option<String>, Option<String>)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn into_slot(
        (id, status, occupant_name, booking_id): (SlotId, String, Option<String>, Option<String>),
    ) -> Result<Slot, ParkingError> {
        let booking_id = booking_id
            .map(|raw| {
                BookingId::parse(&raw)
                    .map_err(|_| ParkingError::Storage(format!("slot {id} holds malformed booking id")))
            })
            .transpose()?;
        Ok(Slot {
            id,
            status: status.parse()?,
            occupant_name,
            booking_id,
        })
    }

    fn query_one(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<Slot>, ParkingError> {
        conn.query_row(sql, params, Self::slot_from_row)
            .optional()?
            .map(Self::into_slot)
            .transpose()
    }

    fn close_active(
        tx: &Transaction<'_>,
        booking_id: &str,
        state: BookingState,
        at_ms: i64,
    ) -> Result<usize, ParkingError> {
        Ok(tx.execute(
            "UPDATE bookings SET status = ?1, closed_at_ms = ?2 WHERE booking_id = ?3 AND status = ?4",
            params![state.as_str(), at_ms, booking_id, BookingState::Active.as_str()],
        )?)
    }
}

fn now_sql() -> i64 {
    i64::try_from(now_ms()).unwrap_or(i64::MAX)
}

impl SlotStore for SqliteSlotStore {
    fn initialize(&self, capacity: u32) -> Result<(), ParkingError> {
        if capacity == 0 {
            return Err(ParkingError::InvalidInput("capacity must be greater than 0".into()));
        }
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for migration in Self::migrations() {
            tx.execute_batch(migration)?;
        }
        let persisted: u32 = tx.query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))?;
        if persisted == 0 {
            {
                let mut insert =
                    tx.prepare("INSERT INTO slots (id, status) VALUES (?1, ?2)")?;
                for id in 1..=capacity {
                    insert.execute(params![id, SlotStatus::Available.as_str()])?;
                }
            }
            tx.commit()?;
            tracing::debug!("seeded {} slots", capacity);
            return Ok(());
        }
        if persisted != capacity {
            return Err(ParkingError::CapacityMismatch {
                configured: capacity,
                persisted,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<Slot>, ParkingError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {SLOT_COLUMNS} FROM slots ORDER BY id"))?;
        let rows = stmt.query_map([], Self::slot_from_row)?;
        let slots = rows.map(|row| Self::into_slot(row?)).collect();
        slots
    }

    fn find_available(&self) -> Result<Slot, ParkingError> {
        let conn = self.conn.lock();
        Self::query_one(
            &conn,
            &format!("SELECT {SLOT_COLUMNS} FROM slots WHERE status = ?1 ORDER BY id LIMIT 1"),
            params![SlotStatus::Available.as_str()],
        )?
        .ok_or(ParkingError::NoAvailableSlot)
    }

    fn find_by_booking_id(&self, booking_id: &BookingId) -> Result<Slot, ParkingError> {
        let conn = self.conn.lock();
        Self::query_one(
            &conn,
            &format!("SELECT {SLOT_COLUMNS} FROM slots WHERE booking_id = ?1 AND status = ?2"),
            params![booking_id.as_str(), SlotStatus::Occupied.as_str()],
        )?
        .ok_or_else(|| ParkingError::BookingNotFound(booking_id.to_string()))
    }

    fn update_slot(
        &self,
        id: SlotId,
        status: SlotStatus,
        occupant: Option<&str>,
        booking_id: Option<&BookingId>,
    ) -> Result<(), ParkingError> {
        check_slot_fields(status, occupant, booking_id)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let displaced: Option<Option<String>> = tx
            .query_row("SELECT booking_id FROM slots WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(displaced) = displaced else {
            return Err(ParkingError::Storage(format!("slot {id} does not exist")));
        };

        let token = booking_id.map(BookingId::as_str);
        let changed = match status {
            SlotStatus::Occupied => tx.execute(
                "UPDATE slots SET status = ?1, occupant_name = ?2, booking_id = ?3 \
                 WHERE id = ?4 AND status = ?5",
                params![status.as_str(), occupant, token, id, SlotStatus::Available.as_str()],
            )?,
            SlotStatus::Available => tx.execute(
                "UPDATE slots SET status = ?1, occupant_name = ?2, booking_id = ?3 WHERE id = ?4",
                params![status.as_str(), occupant, token, id],
            )?,
        };
        if changed == 0 {
            return Err(ParkingError::Storage(format!("slot {id} is already occupied")));
        }

        let now = now_sql();
        if let Some(previous) = displaced {
            Self::close_active(&tx, &previous, BookingState::Completed, now)?;
        }
        if let (Some(token), Some(name)) = (booking_id, occupant) {
            tx.execute(
                "INSERT INTO bookings (booking_id, slot_id, occupant_name, booked_at_ms, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![token.as_str(), id, name, now, BookingState::Active.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn reset_all(&self) -> Result<usize, ParkingError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let occupied: i64 = tx.query_row(
            "SELECT COUNT(*) FROM slots WHERE status = ?1",
            params![SlotStatus::Occupied.as_str()],
            |row| row.get(0),
        )?;
        tx.execute(
            "UPDATE slots SET status = ?1, occupant_name = NULL, booking_id = NULL",
            params![SlotStatus::Available.as_str()],
        )?;
        tx.execute(
            "UPDATE bookings SET status = ?1, closed_at_ms = ?2 WHERE status = ?3",
            params![BookingState::Reset.as_str(), now_sql(), BookingState::Active.as_str()],
        )?;
        tx.commit()?;
        Ok(usize::try_from(occupied).unwrap_or(0))
    }

    fn booking_history(&self, limit: usize) -> Result<Vec<BookingRecord>, ParkingError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT booking_id, slot_id, occupant_name, booked_at_ms, closed_at_ms, status \
             FROM bookings ORDER BY id DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, SlotId>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;
        let records = rows.map(|row| {
            let (booking_id, slot_id, occupant_name, booked_at, closed_at, state) = row?;
            Ok(BookingRecord {
                booking_id: BookingId::parse(&booking_id).map_err(|_| {
                    ParkingError::Storage(format!("ledger holds malformed booking id `{booking_id}`"))
                })?,
                slot_id,
                occupant_name,
                booked_at_ms: u64::try_from(booked_at).unwrap_or(0),
                closed_at_ms: closed_at.map(|t| u64::try_from(t).unwrap_or(0)),
                state: state.parse()?,
            })
        })
        .collect();
        records
    }
}
