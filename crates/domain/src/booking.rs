// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking record and the request payload that creates one.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::payment::{PaymentEntry, RefundInfo};
use crate::status::{BookingStatus, PaymentStatus};
use crate::types::{ContactInfo, Money, PartySize};

/// Payload for creating a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub tour_id: i64,
    pub departure_date: Date,
    pub party_size: PartySize,
    pub contact: ContactInfo,
    pub total_amount: Money,
    pub deposit_amount: Money,
}

/// A tour booking.
///
/// Bookings are never deleted: terminal outcomes are recorded by status,
/// and `payments`/`refund` form the append-only audit trail. All
/// mutation goes through the booking engine's transition operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Canonical id assigned by the store on insert. `None` indicates the
    /// booking has not been persisted yet.
    pub booking_id: Option<i64>,
    /// Human-readable reference, unique and immutable once issued.
    pub code: String,
    pub tour_id: i64,
    pub departure_date: Date,
    pub party_size: PartySize,
    pub contact: ContactInfo,
    pub total_amount: Money,
    pub deposit_amount: Money,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
    /// Append-only payment trail.
    pub payments: Vec<PaymentEntry>,
    /// Refund request, set at most once over the booking's life.
    pub refund: Option<RefundInfo>,
    pub cancelled_by: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: OffsetDateTime,
    pub confirmed_at: Option<OffsetDateTime>,
    pub cancelled_at: Option<OffsetDateTime>,
}

impl Booking {
    /// Creates a fresh, unpersisted booking in `Pending`/`Pending` state.
    #[must_use]
    pub fn new(code: String, request: &BookingRequest, created_at: OffsetDateTime) -> Self {
        Self {
            booking_id: None,
            code,
            tour_id: request.tour_id,
            departure_date: request.departure_date,
            party_size: request.party_size,
            contact: request.contact.clone(),
            total_amount: request.total_amount,
            deposit_amount: request.deposit_amount,
            payment_status: PaymentStatus::Pending,
            booking_status: BookingStatus::Pending,
            payments: Vec::new(),
            refund: None,
            cancelled_by: None,
            cancellation_reason: None,
            created_at,
            confirmed_at: None,
            cancelled_at: None,
        }
    }

    /// The balance left after the deposit: `total - deposit`.
    #[must_use]
    pub const fn remaining_amount(&self) -> Money {
        self.total_amount.saturating_sub(self.deposit_amount)
    }

    /// Sums the money captured so far; failed attempts do not count.
    #[must_use]
    pub fn amount_paid(&self) -> Money {
        self.payments
            .iter()
            .filter(|entry| entry.is_completed())
            .fold(Money::zero(), |sum, entry| sum.saturating_add(entry.amount))
    }

    /// Returns true if a refund has been requested (decided or not).
    #[must_use]
    pub const fn has_refund_request(&self) -> bool {
        self.refund.is_some()
    }

    /// Returns true if the payment trail already contains this
    /// transaction id.
    #[must_use]
    pub fn has_payment(&self, transaction_id: &str) -> bool {
        self.payments
            .iter()
            .any(|entry| entry.transaction_id == transaction_id)
    }
}
