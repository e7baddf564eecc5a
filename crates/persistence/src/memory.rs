// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use wayfare_domain::Booking;

use crate::BookingStore;
use crate::error::StoreError;

#[derive(Debug)]
struct Inner {
    bookings: HashMap<i64, Booking>,
    codes: HashMap<String, i64>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            bookings: HashMap::new(),
            codes: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory booking store.
///
/// Ids are assigned sequentially starting from 1 and codes are kept
/// unique by a secondary index. All operations hold a single mutex, so
/// each store call is atomic with respect to every other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookingStore for MemoryStore {
    fn insert(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        let mut inner = self.lock();
        if inner.codes.contains_key(&booking.code) {
            return Err(StoreError::DuplicateCode(booking.code));
        }

        let booking_id: i64 = inner.next_id;
        inner.next_id += 1;
        booking.booking_id = Some(booking_id);
        inner.codes.insert(booking.code.clone(), booking_id);
        inner.bookings.insert(booking_id, booking.clone());
        debug!(booking_id, code = %booking.code, "Inserted booking");
        Ok(booking)
    }

    fn get(&self, booking_id: i64) -> Result<Booking, StoreError> {
        self.lock()
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(StoreError::BookingNotFound(booking_id))
    }

    fn find_by_code(&self, code: &str) -> Result<Booking, StoreError> {
        let inner = self.lock();
        let booking_id: i64 = *inner
            .codes
            .get(code)
            .ok_or_else(|| StoreError::CodeNotFound(code.to_owned()))?;
        inner
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(StoreError::BookingNotFound(booking_id))
    }

    fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let Some(booking_id) = booking.booking_id else {
            return Err(StoreError::MissingId);
        };

        let mut inner = self.lock();
        let Some(existing) = inner.bookings.get(&booking_id) else {
            return Err(StoreError::BookingNotFound(booking_id));
        };
        // Codes are immutable once issued, but keep the index honest if
        // one ever changes.
        if existing.code != booking.code {
            let old_code: String = existing.code.clone();
            inner.codes.remove(&old_code);
            inner.codes.insert(booking.code.clone(), booking_id);
        }
        inner.bookings.insert(booking_id, booking.clone());
        debug!(booking_id, code = %booking.code, "Updated booking");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Booking>, StoreError> {
        let inner = self.lock();
        let mut bookings: Vec<Booking> = inner.bookings.values().cloned().collect();
        bookings.sort_by_key(|booking| booking.booking_id);
        Ok(bookings)
    }
}
