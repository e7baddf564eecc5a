// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of one mutex per booking id.
///
/// Every mutating engine operation holds its booking's mutex for the
/// whole read-modify-write, so racing calls on one booking serialize
/// while different bookings proceed in parallel. Entries are created
/// lazily and never removed; bookings are never deleted, so the registry
/// stays bounded by the booking count.
#[derive(Debug, Default)]
pub(crate) struct BookingLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl BookingLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex for a booking, creating it on first use.
    pub(crate) fn entry(&self, booking_id: i64) -> Arc<Mutex<()>> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(inner.entry(booking_id).or_default())
    }
}
