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

mod booking;
mod error;
mod payment;
mod refund;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{Booking, BookingRequest};
pub use error::DomainError;
pub use payment::{PaymentEntry, PaymentEntryStatus, PaymentMethod, RefundDecision, RefundInfo};
pub use refund::{RefundPolicy, RefundQuote, RefundTier, days_until_departure};
pub use status::{BookingStatus, PaymentStatus};
pub use types::{ContactInfo, Money, PartySize};
pub use validation::{
    validate_booking_request, validate_cancelled_by, validate_contact, validate_payment_amount,
    validate_reason, validate_transaction_id,
};
