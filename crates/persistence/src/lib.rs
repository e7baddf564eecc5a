// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking storage for the Wayfare booking engine.
//!
//! The booking engine talks to storage only through the [`BookingStore`]
//! trait, so the concrete backend can be swapped without touching the
//! lifecycle logic. This crate ships [`MemoryStore`], the in-process
//! backend used by the engine's default wiring and by tests.
//!
//! Stores deal in whole [`Booking`] records: the engine loads a record,
//! applies a transition, and writes the full record back. Per-field
//! patching is deliberately not part of the contract.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use wayfare_domain::Booking;

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

/// Storage contract for booking records.
///
/// Implementations must be safe to share across threads; the engine
/// holds a store behind an `Arc` and calls it from concurrent request
/// handlers.
pub trait BookingStore: Send + Sync {
    /// Persists a new booking, assigning its id.
    ///
    /// # Arguments
    /// * `booking` - A fresh booking with `booking_id` unset
    ///
    /// # Returns
    /// The stored booking with `booking_id` populated
    ///
    /// # Errors
    /// Returns `StoreError::DuplicateCode` if the booking code is
    /// already taken, or `StoreError::Unavailable` if the backend
    /// cannot be reached.
    fn insert(&self, booking: Booking) -> Result<Booking, StoreError>;

    /// Fetches a booking by id.
    ///
    /// # Errors
    /// Returns `StoreError::BookingNotFound` if no booking has this id.
    fn get(&self, booking_id: i64) -> Result<Booking, StoreError>;

    /// Fetches a booking by its human-readable code.
    ///
    /// # Errors
    /// Returns `StoreError::CodeNotFound` if no booking has this code.
    fn find_by_code(&self, code: &str) -> Result<Booking, StoreError>;

    /// Replaces the stored record for an already-persisted booking.
    ///
    /// # Errors
    /// Returns `StoreError::MissingId` if the booking was never
    /// persisted, or `StoreError::BookingNotFound` if its id is gone.
    fn update(&self, booking: &Booking) -> Result<(), StoreError>;

    /// Returns all bookings ordered by id.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the backend cannot be
    /// reached.
    fn list(&self) -> Result<Vec<Booking>, StoreError>;
}
