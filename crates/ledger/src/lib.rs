// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Seat capacity tracking per tour departure.
//!
//! Each (tour, departure date) pair owns one bucket. Reservation is an
//! atomic check-and-increment under the bucket's own mutex; buckets never
//! contend with each other. The outer map lock is only taken for writing
//! when a new bucket is opened. A full bucket fails immediately; nothing
//! ever waits for capacity to free up.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use time::Date;
use tracing::debug;

/// Identifies the capacity bucket for one tour's departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub tour_id: i64,
    pub departure_date: Date,
}

impl BucketKey {
    /// Creates a bucket key.
    #[must_use]
    pub const fn new(tour_id: i64, departure_date: Date) -> Self {
        Self {
            tour_id,
            departure_date,
        }
    }
}

/// A point-in-time view of one bucket's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketUsage {
    pub max: u32,
    pub reserved: u32,
}

impl BucketUsage {
    /// Seats still available for sale.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.max.saturating_sub(self.reserved)
    }
}

/// Errors from capacity ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The reservation would oversell the bucket.
    #[error(
        "capacity exceeded for tour {tour_id} departing {departure_date}: \
         requested {requested}, available {available}"
    )]
    CapacityExceeded {
        tour_id: i64,
        departure_date: Date,
        requested: u32,
        available: u32,
    },
    /// No bucket has been opened for this departure.
    #[error("no capacity bucket open for tour {tour_id} departing {departure_date}")]
    UnknownBucket { tour_id: i64, departure_date: Date },
    /// A bucket for this departure already exists.
    #[error("capacity bucket already open for tour {tour_id} departing {departure_date}")]
    BucketAlreadyOpen { tour_id: i64, departure_date: Date },
}

#[derive(Debug)]
struct Bucket {
    max: u32,
    reserved: u32,
    /// Booking ids whose seats have already been returned. Release is
    /// keyed by booking id, not by raw count, so a retried release can
    /// never decrement twice.
    released: HashSet<i64>,
}

/// Arena of capacity buckets keyed by (tour, departure date).
///
/// Thread-safe; share it behind an `Arc`. Counters are mutated only in
/// single assignments after their checks, so a panicking caller cannot
/// leave a bucket half-updated and poisoned locks are safe to recover.
#[derive(Debug, Default)]
pub struct CapacityLedger {
    buckets: RwLock<HashMap<BucketKey, Mutex<Bucket>>>,
}

impl CapacityLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_buckets(&self) -> RwLockReadGuard<'_, HashMap<BucketKey, Mutex<Bucket>>> {
        self.buckets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_buckets(&self) -> RwLockWriteGuard<'_, HashMap<BucketKey, Mutex<Bucket>>> {
        self.buckets.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_bucket(bucket: &Mutex<Bucket>) -> MutexGuard<'_, Bucket> {
        bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the capacity bucket for a departure.
    ///
    /// # Arguments
    /// * `key` - The departure to open
    /// * `max` - The departure's seat capacity
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::BucketAlreadyOpen` if the departure already
    /// has a bucket.
    pub fn open(&self, key: BucketKey, max: u32) -> Result<(), LedgerError> {
        let mut buckets = self.write_buckets();
        if buckets.contains_key(&key) {
            return Err(LedgerError::BucketAlreadyOpen {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
            });
        }

        buckets.insert(
            key,
            Mutex::new(Bucket {
                max,
                reserved: 0,
                released: HashSet::new(),
            }),
        );
        debug!(
            tour_id = key.tour_id,
            departure_date = %key.departure_date,
            max,
            "opened capacity bucket"
        );
        Ok(())
    }

    /// Atomically reserves seats in a bucket.
    ///
    /// The check against `available` and the increment happen under the
    /// bucket's mutex in one indivisible step; two racing reservations
    /// can never jointly oversell.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CapacityExceeded` if fewer than `seats`
    /// seats remain, or `LedgerError::UnknownBucket` for an unopened
    /// departure. A failed reservation changes nothing.
    pub fn reserve(&self, key: &BucketKey, seats: u32) -> Result<(), LedgerError> {
        let buckets = self.read_buckets();
        let Some(bucket) = buckets.get(key) else {
            return Err(LedgerError::UnknownBucket {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
            });
        };

        let mut bucket = Self::lock_bucket(bucket);
        let available: u32 = bucket.max.saturating_sub(bucket.reserved);
        if seats > available {
            return Err(LedgerError::CapacityExceeded {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
                requested: seats,
                available,
            });
        }

        bucket.reserved += seats;
        debug!(
            tour_id = key.tour_id,
            departure_date = %key.departure_date,
            seats,
            reserved = bucket.reserved,
            "reserved seats"
        );
        Ok(())
    }

    /// Returns a booking's seats to its bucket, at most once per booking.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if this call performed the release, `Ok(false)` if the
    /// booking's seats were already returned (idempotent no-op).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownBucket` for an unopened departure.
    pub fn release(
        &self,
        key: &BucketKey,
        booking_id: i64,
        seats: u32,
    ) -> Result<bool, LedgerError> {
        let buckets = self.read_buckets();
        let Some(bucket) = buckets.get(key) else {
            return Err(LedgerError::UnknownBucket {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
            });
        };

        let mut bucket = Self::lock_bucket(bucket);
        if !bucket.released.insert(booking_id) {
            debug!(
                tour_id = key.tour_id,
                departure_date = %key.departure_date,
                booking_id,
                "seats already released for booking"
            );
            return Ok(false);
        }

        bucket.reserved = bucket.reserved.saturating_sub(seats);
        debug!(
            tour_id = key.tour_id,
            departure_date = %key.departure_date,
            booking_id,
            seats,
            reserved = bucket.reserved,
            "released seats"
        );
        Ok(true)
    }

    /// Returns seats from a reservation that never became a booking.
    ///
    /// This is the compensation path for a failed persist after a
    /// successful `reserve`; there is no booking id yet, so the
    /// idempotency guard does not apply.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownBucket` for an unopened departure.
    pub fn rollback(&self, key: &BucketKey, seats: u32) -> Result<(), LedgerError> {
        let buckets = self.read_buckets();
        let Some(bucket) = buckets.get(key) else {
            return Err(LedgerError::UnknownBucket {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
            });
        };

        let mut bucket = Self::lock_bucket(bucket);
        bucket.reserved = bucket.reserved.saturating_sub(seats);
        debug!(
            tour_id = key.tour_id,
            departure_date = %key.departure_date,
            seats,
            reserved = bucket.reserved,
            "rolled back unpersisted reservation"
        );
        Ok(())
    }

    /// Reads a bucket's current occupancy.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownBucket` for an unopened departure.
    pub fn usage(&self, key: &BucketKey) -> Result<BucketUsage, LedgerError> {
        let buckets = self.read_buckets();
        let Some(bucket) = buckets.get(key) else {
            return Err(LedgerError::UnknownBucket {
                tour_id: key.tour_id,
                departure_date: key.departure_date,
            });
        };

        let bucket = Self::lock_bucket(bucket);
        Ok(BucketUsage {
            max: bucket.max,
            reserved: bucket.reserved,
        })
    }
}
