// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Party size must be at least one traveller.
    InvalidPartySize {
        /// The rejected seat count.
        size: u32,
    },
    /// Monetary amounts must be non-negative.
    NegativeAmount {
        /// The rejected amount in integer currency units.
        amount: i64,
    },
    /// The deposit cannot exceed the total amount.
    DepositExceedsTotal {
        /// The deposit in integer currency units.
        deposit: i64,
        /// The total in integer currency units.
        total: i64,
    },
    /// A payment must move a positive amount of money.
    InvalidPaymentAmount {
        /// The rejected amount in integer currency units.
        amount: i64,
    },
    /// A contact field is empty or malformed.
    InvalidContact {
        /// The offending field name.
        field: &'static str,
        /// Description of the validation failure.
        reason: String,
    },
    /// The departure date is not in the future.
    DepartureNotInFuture {
        /// The rejected departure date.
        departure_date: time::Date,
    },
    /// Booking status string is not recognised.
    InvalidBookingStatus(String),
    /// Payment status string is not recognised.
    InvalidPaymentStatus(String),
    /// Payment method string is not recognised.
    InvalidPaymentMethod(String),
    /// Refund decision string is not recognised.
    InvalidRefundDecision(String),
    /// The requested status transition is not allowed.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is forbidden.
        reason: String,
    },
    /// A refund tier table failed validation.
    InvalidRefundPolicy {
        /// Description of the malformed table.
        reason: String,
    },
    /// A free-text reason is required but was blank.
    EmptyReason,
    /// A payment transaction id is required but was blank.
    EmptyTransactionId,
    /// The actor performing a cancellation must be identified.
    EmptyCancelledBy,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPartySize { size } => {
                write!(f, "Invalid party size: {size}. Must be greater than 0")
            }
            Self::NegativeAmount { amount } => {
                write!(f, "Invalid amount: {amount}. Must be non-negative")
            }
            Self::DepositExceedsTotal { deposit, total } => {
                write!(f, "Deposit {deposit} exceeds total amount {total}")
            }
            Self::InvalidPaymentAmount { amount } => {
                write!(f, "Invalid payment amount: {amount}. Must be greater than 0")
            }
            Self::InvalidContact { field, reason } => {
                write!(f, "Invalid contact {field}: {reason}")
            }
            Self::DepartureNotInFuture { departure_date } => {
                write!(f, "Departure date {departure_date} is not in the future")
            }
            Self::InvalidBookingStatus(msg) => write!(f, "Invalid booking status: {msg}"),
            Self::InvalidPaymentStatus(msg) => write!(f, "Invalid payment status: {msg}"),
            Self::InvalidPaymentMethod(msg) => write!(f, "Invalid payment method: {msg}"),
            Self::InvalidRefundDecision(msg) => write!(f, "Invalid refund decision: {msg}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidRefundPolicy { reason } => {
                write!(f, "Invalid refund policy: {reason}")
            }
            Self::EmptyReason => write!(f, "A reason is required and cannot be blank"),
            Self::EmptyTransactionId => {
                write!(f, "A transaction id is required and cannot be blank")
            }
            Self::EmptyCancelledBy => {
                write!(f, "The cancelling actor is required and cannot be blank")
            }
        }
    }
}

impl std::error::Error for DomainError {}
