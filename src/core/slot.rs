//! Slot and booking domain types.
//!
//! These are the typed records the stores convert rows into; allocation logic
//! never sees raw storage rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ParkingError;

/// Stable slot identifier, `1..=capacity`.
pub type SlotId = u32;

/// Length of every booking token.
pub const BOOKING_ID_LEN: usize = 8;

/// Characters a booking token is drawn from.
pub const BOOKING_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Longest accepted occupant name, in characters.
pub const MAX_OCCUPANT_NAME_LEN: usize = 64;

/// Occupancy state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Free to be booked.
    Available,
    /// Held by an active booking.
    Occupied,
}

impl SlotStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "OCCUPIED" => Ok(Self::Occupied),
            other => Err(ParkingError::Storage(format!("unknown slot status `{other}`"))),
        }
    }
}

/// Eight-character token identifying one active occupancy.
///
/// Always upper-case alphanumeric; construct through [`BookingId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingId(String);

impl BookingId {
    /// Normalize (trim, upper-case) and validate a user-supplied token.
    pub fn parse(raw: &str) -> Result<Self, ParkingError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ParkingError::InvalidInput("booking id must not be empty".into()));
        }
        if normalized.len() != BOOKING_ID_LEN
            || !normalized.bytes().all(|b| BOOKING_ID_ALPHABET.contains(&b))
        {
            return Err(ParkingError::InvalidInput(format!(
                "booking id must be {BOOKING_ID_LEN} letters or digits"
            )));
        }
        Ok(Self(normalized))
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookingId {
    type Error = ParkingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookingId> for String {
    fn from(value: BookingId) -> Self {
        value.0
    }
}

/// One parking space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot identifier.
    pub id: SlotId,
    /// Current occupancy.
    pub status: SlotStatus,
    /// Occupant, present only while occupied.
    pub occupant_name: Option<String>,
    /// Active booking token, present only while occupied.
    pub booking_id: Option<BookingId>,
}

impl Slot {
    /// A freshly seeded, empty slot.
    pub const fn available(id: SlotId) -> Self {
        Self {
            id,
            status: SlotStatus::Available,
            occupant_name: None,
            booking_id: None,
        }
    }

    /// Whether the slot can be booked.
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

/// Check that a prospective slot write keeps status, occupant and token consistent.
///
/// OCCUPIED needs both an occupant and a token; AVAILABLE needs neither.
pub fn check_slot_fields(
    status: SlotStatus,
    occupant: Option<&str>,
    booking_id: Option<&BookingId>,
) -> Result<(), ParkingError> {
    match (status, occupant, booking_id) {
        (SlotStatus::Occupied, Some(name), Some(_)) if !name.trim().is_empty() => Ok(()),
        (SlotStatus::Available, None, None) => Ok(()),
        (status, _, _) => Err(ParkingError::InvalidInput(format!(
            "inconsistent fields for {status} slot"
        ))),
    }
}

/// Trim and validate an occupant name.
pub fn validate_occupant_name(raw: &str) -> Result<String, ParkingError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ParkingError::InvalidInput("occupant name must not be empty".into()));
    }
    if name.chars().count() > MAX_OCCUPANT_NAME_LEN {
        return Err(ParkingError::InvalidInput(format!(
            "occupant name longer than {MAX_OCCUPANT_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(ParkingError::InvalidInput(
            "occupant name contains control characters".into(),
        ));
    }
    Ok(name.to_string())
}

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Slot that was assigned.
    pub slot_id: SlotId,
    /// Token needed to release the slot.
    pub booking_id: BookingId,
    /// Trimmed occupant name.
    pub occupant_name: String,
}

/// Lifecycle of an entry in the booking ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    /// Slot still held.
    Active,
    /// Released by the occupant.
    Completed,
    /// Cleared by an administrative reset.
    Reset,
}

impl BookingState {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Reset => "RESET",
        }
    }
}

impl FromStr for BookingState {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "RESET" => Ok(Self::Reset),
            other => Err(ParkingError::Storage(format!("unknown booking state `{other}`"))),
        }
    }
}

/// One entry of the booking ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Token issued for the booking.
    pub booking_id: BookingId,
    /// Slot that was held.
    pub slot_id: SlotId,
    /// Occupant at booking time.
    pub occupant_name: String,
    /// Booking time, ms since epoch.
    pub booked_at_ms: u64,
    /// Release or reset time, ms since epoch.
    pub closed_at_ms: Option<u64>,
    /// Ledger state.
    pub state: BookingState,
}
