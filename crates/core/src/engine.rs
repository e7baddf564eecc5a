// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking state machine.
//!
//! `BookingEngine` owns every lifecycle transition: it reserves capacity
//! before a booking exists, walks bookings through payment, confirmation,
//! cancellation, refund, and completion, and emits notification events
//! after each committed transition. All status writes go through the
//! domain's transition validation; nothing mutates a booking ad hoc.

use std::sync::{Arc, PoisonError};

use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};
use wayfare_domain::{
    Booking, BookingRequest, BookingStatus, DomainError, Money, PaymentEntry, PaymentMethod,
    PaymentStatus, RefundDecision, RefundInfo, RefundPolicy, RefundQuote, days_until_departure,
    validate_booking_request, validate_cancelled_by, validate_payment_amount, validate_reason,
    validate_transaction_id,
};
use wayfare_events::{BookingEvent, EventDispatcher};
use wayfare_ledger::{BucketKey, BucketUsage, CapacityLedger, LedgerError};
use wayfare_persistence::{BookingStore, MemoryStore, StoreError};

use crate::clock::Clock;
use crate::error::BookingError;
use crate::locks::BookingLocks;

/// How many fresh codes to try when the store reports a collision.
const MAX_CODE_ATTEMPTS: u8 = 3;

/// The booking lifecycle engine.
///
/// Shared behind an `Arc` across request handlers; every operation is
/// safe to call concurrently. Writes to one booking serialize on that
/// booking's lock, capacity movements serialize per bucket, and nothing
/// takes a system-wide lock.
pub struct BookingEngine {
    store: Arc<dyn BookingStore>,
    ledger: Arc<CapacityLedger>,
    events: EventDispatcher,
    clock: Arc<dyn Clock>,
    policy: RefundPolicy,
    locks: BookingLocks,
}

impl BookingEngine {
    /// Creates an engine over explicit collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        ledger: Arc<CapacityLedger>,
        events: EventDispatcher,
        clock: Arc<dyn Clock>,
        policy: RefundPolicy,
    ) -> Self {
        Self {
            store,
            ledger,
            events,
            clock,
            policy,
            locks: BookingLocks::new(),
        }
    }

    /// Creates an engine over a fresh in-memory store and ledger.
    #[must_use]
    pub fn in_memory(policy: RefundPolicy, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CapacityLedger::new()),
            EventDispatcher::new(),
            clock,
            policy,
        )
    }

    /// The dispatcher that notification consumers subscribe to.
    #[must_use]
    pub const fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// The refund policy this engine prices cancellations with.
    #[must_use]
    pub const fn policy(&self) -> &RefundPolicy {
        &self.policy
    }

    /// Opens the capacity bucket for a tour departure.
    ///
    /// Bookings for a departure are only accepted once its bucket exists.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` if the departure was already
    /// opened.
    pub fn open_departure(
        &self,
        tour_id: i64,
        departure_date: Date,
        max_capacity: u32,
    ) -> Result<(), BookingError> {
        let key: BucketKey = BucketKey::new(tour_id, departure_date);
        self.ledger.open(key, max_capacity).map_err(ledger_error)?;
        info!(
            tour_id,
            departure_date = %departure_date,
            max_capacity,
            "Opened departure"
        );
        Ok(())
    }

    /// Creates a booking, reserving its seats first.
    ///
    /// The reservation and the persisted booking stand or fall together:
    /// if the store rejects the insert, the reserved seats are returned
    /// before the error propagates, so a failed create leaves no trace.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::DomainViolation` for an invalid request,
    /// `BookingError::CapacityExceeded` if the departure cannot seat the
    /// party, `BookingError::NotFound` if the departure was never opened,
    /// or `BookingError::Unavailable` if persistence fails.
    pub fn create_booking(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let now: OffsetDateTime = self.clock.now();
        validate_booking_request(&request, now.date())?;

        // Reserve before persisting; a full bucket fails here and nothing
        // else happens.
        let key: BucketKey = BucketKey::new(request.tour_id, request.departure_date);
        let seats: u32 = request.party_size.seats();
        self.ledger.reserve(&key, seats).map_err(ledger_error)?;

        // The reservation is held from here on: every failure path below
        // must hand the seats back before returning.
        let mut attempt: u8 = 1;
        let inserted: Booking = loop {
            let code: String = generate_code(now.date());
            let booking: Booking = Booking::new(code, &request, now);
            match self.store.insert(booking) {
                Ok(inserted) => break inserted,
                Err(StoreError::DuplicateCode(code)) if attempt < MAX_CODE_ATTEMPTS => {
                    debug!(code = %code, attempt, "Booking code collision, regenerating");
                    attempt += 1;
                }
                Err(err) => {
                    if let Err(rollback_err) = self.ledger.rollback(&key, seats) {
                        warn!(
                            error = %rollback_err,
                            tour_id = request.tour_id,
                            departure_date = %request.departure_date,
                            "Failed to return seats after persist failure"
                        );
                    }
                    return Err(store_error(err));
                }
            }
        };

        info!(
            booking_id = ?inserted.booking_id,
            code = %inserted.code,
            tour_id = inserted.tour_id,
            departure_date = %inserted.departure_date,
            seats,
            "Created booking"
        );
        Ok(inserted)
    }

    /// Appends a payment to a booking and recomputes its payment status.
    ///
    /// When cumulative completed payments reach the total, the booking is
    /// confirmed and `booking.confirmed` is emitted; a booking already
    /// confirmed by the operator path keeps its status and emits nothing.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` if the booking is cancelled,
    /// `BookingError::AlreadyProcessed` if the transaction id was seen
    /// before (the payment trail is untouched), or
    /// `BookingError::DomainViolation` for a zero amount or blank
    /// transaction id.
    pub fn record_payment(
        &self,
        booking_id: i64,
        amount: Money,
        method: PaymentMethod,
        transaction_id: &str,
    ) -> Result<Booking, BookingError> {
        validate_payment_amount(amount)?;
        validate_transaction_id(transaction_id)?;

        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        if booking.booking_status == BookingStatus::Cancelled {
            return Err(BookingError::InvalidState {
                operation: "record_payment",
                reason: format!("booking {booking_id} is cancelled"),
            });
        }
        if booking.has_payment(transaction_id) {
            return Err(BookingError::AlreadyProcessed {
                transaction_id: transaction_id.to_owned(),
            });
        }

        let now: OffsetDateTime = self.clock.now();
        // The transaction id is an exact-match idempotency key; it is
        // stored verbatim.
        booking.payments.push(PaymentEntry::completed(
            amount,
            method,
            transaction_id.to_owned(),
            now,
        ));

        let recomputed: PaymentStatus =
            PaymentStatus::for_amounts(booking.amount_paid(), booking.total_amount);
        if recomputed != booking.payment_status {
            booking.payment_status.validate_transition(recomputed)?;
            booking.payment_status = recomputed;
        }

        // Full payment confirms a pending booking; the event fires only
        // for the transition itself, never for later payments.
        let confirmed_now: bool = booking.payment_status == PaymentStatus::Paid
            && booking.booking_status == BookingStatus::Pending;
        if confirmed_now {
            confirm(&mut booking, now)?;
        }

        self.store.update(&booking).map_err(store_error)?;

        if confirmed_now {
            self.events.dispatch(&BookingEvent::BookingConfirmed {
                booking_id,
                code: booking.code.clone(),
            });
        }
        info!(
            booking_id,
            transaction_id = %transaction_id,
            amount = %amount,
            payment_status = %booking.payment_status,
            "Recorded payment"
        );
        Ok(booking)
    }

    /// Confirms a pending booking by explicit operator action.
    ///
    /// Converges on the same transition as payment-driven confirmation,
    /// so `booking.confirmed` can never fire twice for one booking.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` unless the booking is
    /// pending.
    pub fn confirm_booking(&self, booking_id: i64) -> Result<Booking, BookingError> {
        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        if booking.booking_status != BookingStatus::Pending {
            return Err(BookingError::InvalidState {
                operation: "confirm_booking",
                reason: format!(
                    "booking {booking_id} is {}, only pending bookings can be confirmed",
                    booking.booking_status
                ),
            });
        }

        let now: OffsetDateTime = self.clock.now();
        confirm(&mut booking, now)?;
        self.store.update(&booking).map_err(store_error)?;

        self.events.dispatch(&BookingEvent::BookingConfirmed {
            booking_id,
            code: booking.code.clone(),
        });
        info!(booking_id, code = %booking.code, "Confirmed booking");
        Ok(booking)
    }

    /// Prices and stores a refund request, pending decision.
    ///
    /// The quote is computed by the engine's refund policy from the
    /// days left until departure. Nothing about the booking's payment or
    /// reservation changes until the request is decided.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` when the booking already has
    /// a refund request, is not confirmed, is not fully paid, or its
    /// departure has already passed; `BookingError::DomainViolation` for
    /// a blank reason.
    pub fn request_refund(
        &self,
        booking_id: i64,
        reason: &str,
    ) -> Result<RefundInfo, BookingError> {
        validate_reason(reason)?;

        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        if booking.has_refund_request() {
            return Err(BookingError::InvalidState {
                operation: "request_refund",
                reason: format!("booking {booking_id} already has a refund request"),
            });
        }
        if booking.booking_status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidState {
                operation: "request_refund",
                reason: format!(
                    "booking {booking_id} is {}, refunds require a confirmed booking",
                    booking.booking_status
                ),
            });
        }
        if booking.payment_status != PaymentStatus::Paid {
            return Err(BookingError::InvalidState {
                operation: "request_refund",
                reason: format!(
                    "booking {booking_id} is {}, refunds require full payment",
                    booking.payment_status
                ),
            });
        }

        let now: OffsetDateTime = self.clock.now();
        if days_until_departure(booking.departure_date, now) <= 0 {
            return Err(BookingError::InvalidState {
                operation: "request_refund",
                reason: format!("departure {} has already passed", booking.departure_date),
            });
        }

        let quote: RefundQuote = self
            .policy
            .quote(booking.departure_date, now, booking.total_amount);
        let refund: RefundInfo = RefundInfo::pending(
            now,
            quote.days_until_departure,
            quote.percentage,
            quote.amount,
            quote.tier_label,
            reason.trim().to_owned(),
        );
        booking.refund = Some(refund.clone());
        self.store.update(&booking).map_err(store_error)?;

        info!(
            booking_id,
            days_until_departure = refund.days_until_departure,
            percentage = refund.percentage,
            amount = %refund.amount,
            tier = %refund.tier_label,
            "Stored refund request"
        );
        Ok(refund)
    }

    /// Decides a pending refund request.
    ///
    /// Approval settles the money back (`payment_status = Refunded`),
    /// cancels the booking unless it was already cancelled directly, and
    /// returns the seats to the bucket exactly once. Rejection records
    /// the decision and changes nothing else.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` if no refund request exists
    /// or it was already decided; a repeated decide call therefore fails
    /// without altering state.
    pub fn decide_refund(
        &self,
        booking_id: i64,
        decision: RefundDecision,
    ) -> Result<Booking, BookingError> {
        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        match booking.refund.as_ref() {
            None => {
                return Err(BookingError::InvalidState {
                    operation: "decide_refund",
                    reason: format!("booking {booking_id} has no refund request"),
                });
            }
            Some(refund) if refund.is_decided() => {
                return Err(BookingError::InvalidState {
                    operation: "decide_refund",
                    reason: format!("the refund for booking {booking_id} is already decided"),
                });
            }
            Some(_) => {}
        }

        let approved: bool = decision == RefundDecision::Approved;
        let cancelling: bool = approved && booking.booking_status != BookingStatus::Cancelled;
        let key: BucketKey = BucketKey::new(booking.tour_id, booking.departure_date);

        if approved {
            // All gates pass before any field is written: the release
            // after commit must not be able to fail and strand a refunded
            // booking with seats still held.
            self.ledger.usage(&key).map_err(ledger_error)?;
            booking
                .payment_status
                .validate_transition(PaymentStatus::Refunded)?;
            if cancelling {
                booking
                    .booking_status
                    .validate_transition(BookingStatus::Cancelled)?;
            }
        }

        let now: OffsetDateTime = self.clock.now();
        if let Some(refund) = booking.refund.as_mut() {
            refund.decided_at = Some(now);
            refund.decision = Some(decision);
        }
        if approved {
            booking.payment_status = PaymentStatus::Refunded;
            if cancelling {
                booking.booking_status = BookingStatus::Cancelled;
                booking.cancelled_at = Some(now);
            }
        }

        self.store.update(&booking).map_err(store_error)?;

        if approved {
            self.release_seats(&key, booking_id, booking.party_size.seats(), "refund approval");
        }

        let (amount, percentage): (i64, u8) = booking
            .refund
            .as_ref()
            .map_or((0, 0), |refund| (refund.amount.value(), refund.percentage));
        if approved {
            self.events.dispatch(&BookingEvent::RefundApproved {
                booking_id,
                code: booking.code.clone(),
                amount,
                percentage,
            });
        } else {
            self.events.dispatch(&BookingEvent::RefundRejected {
                booking_id,
                code: booking.code.clone(),
            });
        }
        info!(booking_id, decision = %decision, "Decided refund");
        Ok(booking)
    }

    /// Cancels a booking directly, outside the refund flow.
    ///
    /// Used by operators, typically before payment. Releases the seats
    /// and records who cancelled and why; no refund is computed and no
    /// event is emitted.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` if the booking is already
    /// cancelled or completed, or `BookingError::DomainViolation` for a
    /// blank actor or reason.
    pub fn cancel_booking(
        &self,
        booking_id: i64,
        cancelled_by: &str,
        reason: &str,
    ) -> Result<Booking, BookingError> {
        validate_cancelled_by(cancelled_by)?;
        validate_reason(reason)?;

        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        booking
            .booking_status
            .validate_transition(BookingStatus::Cancelled)
            .map_err(|err| BookingError::InvalidState {
                operation: "cancel_booking",
                reason: err.to_string(),
            })?;

        let key: BucketKey = BucketKey::new(booking.tour_id, booking.departure_date);
        // Bucket existence checked up front so the release after commit
        // cannot fail.
        self.ledger.usage(&key).map_err(ledger_error)?;

        let now: OffsetDateTime = self.clock.now();
        booking.booking_status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        booking.cancelled_by = Some(cancelled_by.trim().to_owned());
        booking.cancellation_reason = Some(reason.trim().to_owned());
        self.store.update(&booking).map_err(store_error)?;

        self.release_seats(&key, booking_id, booking.party_size.seats(), "cancellation");

        info!(
            booking_id,
            code = %booking.code,
            cancelled_by = %cancelled_by,
            "Cancelled booking"
        );
        Ok(booking)
    }

    /// Completes a confirmed booking once its departure has passed.
    ///
    /// Terminal: the seats go back to the bucket and `booking.completed`
    /// (the thank-you notification) is emitted.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::InvalidState` if the booking is not
    /// confirmed or the departure is still in the future.
    pub fn complete_booking(&self, booking_id: i64) -> Result<Booking, BookingError> {
        let entry = self.locks.entry(booking_id);
        let _serialized = entry.lock().unwrap_or_else(PoisonError::into_inner);

        let mut booking: Booking = self.store.get(booking_id).map_err(store_error)?;
        if booking.booking_status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidState {
                operation: "complete_booking",
                reason: format!(
                    "booking {booking_id} is {}, only confirmed bookings complete",
                    booking.booking_status
                ),
            });
        }

        let now: OffsetDateTime = self.clock.now();
        if days_until_departure(booking.departure_date, now) > 0 {
            return Err(BookingError::InvalidState {
                operation: "complete_booking",
                reason: format!("departure {} has not happened yet", booking.departure_date),
            });
        }

        let key: BucketKey = BucketKey::new(booking.tour_id, booking.departure_date);
        self.ledger.usage(&key).map_err(ledger_error)?;

        booking
            .booking_status
            .validate_transition(BookingStatus::Completed)?;
        booking.booking_status = BookingStatus::Completed;
        self.store.update(&booking).map_err(store_error)?;

        self.release_seats(&key, booking_id, booking.party_size.seats(), "completion");

        self.events.dispatch(&BookingEvent::BookingCompleted {
            booking_id,
            code: booking.code.clone(),
        });
        info!(booking_id, code = %booking.code, "Completed booking");
        Ok(booking)
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` for an unknown id.
    pub fn booking(&self, booking_id: i64) -> Result<Booking, BookingError> {
        self.store.get(booking_id).map_err(store_error)
    }

    /// Fetches a booking by its human-readable code.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` for an unknown code.
    pub fn booking_by_code(&self, code: &str) -> Result<Booking, BookingError> {
        self.store.find_by_code(code).map_err(store_error)
    }

    /// All bookings, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Unavailable` if the store cannot be read.
    pub fn bookings(&self) -> Result<Vec<Booking>, BookingError> {
        self.store.list().map_err(store_error)
    }

    /// Current occupancy of a departure's capacity bucket.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotFound` for a departure that was never
    /// opened.
    pub fn departure_usage(
        &self,
        tour_id: i64,
        departure_date: Date,
    ) -> Result<BucketUsage, BookingError> {
        self.ledger
            .usage(&BucketKey::new(tour_id, departure_date))
            .map_err(ledger_error)
    }

    /// Returns a booking's seats after its state change has committed.
    ///
    /// The bucket was prechecked before the commit, so the only outcomes
    /// left are a performed release, an idempotent no-op, or a bucket
    /// that vanished mid-call; none of them can fail the operation.
    fn release_seats(&self, key: &BucketKey, booking_id: i64, seats: u32, context: &'static str) {
        match self.ledger.release(key, booking_id, seats) {
            Ok(true) => {}
            Ok(false) => debug!(booking_id, context, "Seats were already released"),
            Err(err) => warn!(
                booking_id,
                context,
                error = %err,
                "Seat release failed after commit"
            ),
        }
    }
}

/// The single confirmation gate. The payment path and the operator path
/// both come through here, so the pending-to-confirmed transition (and
/// its event) can only ever happen once per booking.
fn confirm(booking: &mut Booking, now: OffsetDateTime) -> Result<(), DomainError> {
    booking
        .booking_status
        .validate_transition(BookingStatus::Confirmed)?;
    booking.booking_status = BookingStatus::Confirmed;
    booking.confirmed_at = Some(now);
    Ok(())
}

/// Generates a booking code, `WF-YYYYMMDD-XXXX` with a random hex suffix.
fn generate_code(today: Date) -> String {
    format!(
        "WF-{:04}{:02}{:02}-{:04X}",
        today.year(),
        u8::from(today.month()),
        today.day(),
        rand::random::<u16>()
    )
}

fn store_error(err: StoreError) -> BookingError {
    match err {
        StoreError::BookingNotFound(id) => BookingError::NotFound(format!("booking {id}")),
        StoreError::CodeNotFound(code) => BookingError::NotFound(format!("booking code {code}")),
        StoreError::DuplicateCode(code) => BookingError::Unavailable(format!(
            "could not allocate a unique booking code (last tried {code})"
        )),
        StoreError::MissingId => {
            BookingError::Unavailable(String::from("booking has no id and cannot be updated"))
        }
        StoreError::Unavailable(msg) => BookingError::Unavailable(msg),
    }
}

fn ledger_error(err: LedgerError) -> BookingError {
    match err {
        LedgerError::CapacityExceeded {
            tour_id,
            departure_date,
            requested,
            available,
        } => BookingError::CapacityExceeded {
            tour_id,
            departure_date,
            requested,
            available,
        },
        LedgerError::UnknownBucket {
            tour_id,
            departure_date,
        } => BookingError::NotFound(format!(
            "capacity bucket for tour {tour_id} departing {departure_date}"
        )),
        LedgerError::BucketAlreadyOpen {
            tour_id,
            departure_date,
        } => BookingError::InvalidState {
            operation: "open_departure",
            reason: format!("tour {tour_id} departing {departure_date} is already open"),
        },
    }
}
