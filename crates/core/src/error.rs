// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use wayfare_domain::DomainError;

/// Errors returned by booking engine operations.
///
/// Business-rule failures (`CapacityExceeded`, `InvalidState`,
/// `AlreadyProcessed`, `DomainViolation`) must not be retried without new
/// input. `Unavailable` is an infrastructure failure and may be retried
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The requested seats would oversell the departure's capacity bucket.
    CapacityExceeded {
        tour_id: i64,
        departure_date: Date,
        requested: u32,
        available: u32,
    },
    /// The operation is not permitted in the booking's current state.
    InvalidState {
        operation: &'static str,
        reason: String,
    },
    /// The requested booking, code, or departure bucket does not exist.
    NotFound(String),
    /// This transaction id was already applied to the booking.
    AlreadyProcessed { transaction_id: String },
    /// A domain rule rejected the input.
    DomainViolation(DomainError),
    /// The storage backend failed; the operation may be retried.
    Unavailable(String),
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded {
                tour_id,
                departure_date,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Capacity exceeded for tour {tour_id} departing {departure_date}: \
                     requested {requested}, available {available}"
                )
            }
            Self::InvalidState { operation, reason } => {
                write!(f, "Invalid state for {operation}: {reason}")
            }
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::AlreadyProcessed { transaction_id } => {
                write!(f, "Transaction {transaction_id} was already processed")
            }
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
