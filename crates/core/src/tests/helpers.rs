// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};
use wayfare_domain::{
    Booking, BookingRequest, ContactInfo, Money, PartySize, PaymentMethod, RefundPolicy,
};
use wayfare_persistence::{BookingStore, MemoryStore, StoreError};

use crate::{BookingEngine, ManualClock};

pub const TOUR_ID: i64 = 42;
pub const TEST_CAPACITY: u32 = 16;

pub fn test_departure() -> Date {
    date!(2026 - 09 - 18)
}

/// 17 calendar days ahead of the test departure.
pub fn test_start() -> OffsetDateTime {
    datetime!(2026-09-01 09:00 UTC)
}

/// Engine over fresh in-memory collaborators, with the test departure
/// already open and the clock pinned to `test_start`.
pub fn create_test_engine() -> (BookingEngine, Arc<ManualClock>) {
    let clock: Arc<ManualClock> = Arc::new(ManualClock::new(test_start()));
    let engine: BookingEngine =
        BookingEngine::in_memory(RefundPolicy::graduated(), clock.clone());
    engine
        .open_departure(TOUR_ID, test_departure(), TEST_CAPACITY)
        .expect("Failed to open test departure");
    (engine, clock)
}

pub fn create_test_request() -> BookingRequest {
    BookingRequest {
        tour_id: TOUR_ID,
        departure_date: test_departure(),
        party_size: PartySize::new(2).unwrap(),
        contact: ContactInfo::new("An Tran", "an@example.com", "+84 90 123 4567"),
        total_amount: Money::new(1_500_000).unwrap(),
        deposit_amount: Money::new(500_000).unwrap(),
    }
}

pub fn create_test_booking(engine: &BookingEngine) -> Booking {
    engine
        .create_booking(create_test_request())
        .expect("Failed to create test booking")
}

/// Pays the booking's full total in one bank transfer.
pub fn pay_in_full(engine: &BookingEngine, booking_id: i64) -> Booking {
    let booking: Booking = engine.booking(booking_id).expect("Unknown test booking");
    engine
        .record_payment(
            booking_id,
            booking.total_amount,
            PaymentMethod::BankTransfer,
            &format!("TXN-FULL-{booking_id}"),
        )
        .expect("Failed to pay test booking in full")
}

/// Creates a booking and pays it in full: `Confirmed`/`Paid`.
pub fn create_paid_booking(engine: &BookingEngine) -> Booking {
    let booking: Booking = create_test_booking(engine);
    pay_in_full(engine, booking.booking_id.unwrap())
}

/// Initializes test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// A store whose writes always fail, for exercising compensation paths.
pub struct FailingStore;

impl BookingStore for FailingStore {
    fn insert(&self, _booking: Booking) -> Result<Booking, StoreError> {
        Err(StoreError::Unavailable(String::from("insert refused")))
    }

    fn get(&self, booking_id: i64) -> Result<Booking, StoreError> {
        Err(StoreError::BookingNotFound(booking_id))
    }

    fn find_by_code(&self, code: &str) -> Result<Booking, StoreError> {
        Err(StoreError::CodeNotFound(code.to_owned()))
    }

    fn update(&self, _booking: &Booking) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(String::from("update refused")))
    }

    fn list(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(Vec::new())
    }
}

/// Rejects the first `collisions` inserts with a duplicate-code error,
/// then behaves like a normal in-memory store.
pub struct CollidingStore {
    inner: MemoryStore,
    remaining: AtomicU32,
}

impl CollidingStore {
    pub fn new(collisions: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            remaining: AtomicU32::new(collisions),
        }
    }
}

impl BookingStore for CollidingStore {
    fn insert(&self, booking: Booking) -> Result<Booking, StoreError> {
        let left: u32 = self.remaining.load(Ordering::SeqCst);
        if left > 0 {
            self.remaining.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::DuplicateCode(booking.code));
        }
        self.inner.insert(booking)
    }

    fn get(&self, booking_id: i64) -> Result<Booking, StoreError> {
        self.inner.get(booking_id)
    }

    fn find_by_code(&self, code: &str) -> Result<Booking, StoreError> {
        self.inner.find_by_code(code)
    }

    fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        self.inner.update(booking)
    }

    fn list(&self) -> Result<Vec<Booking>, StoreError> {
        self.inner.list()
    }
}
