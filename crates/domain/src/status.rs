// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking and payment status tracking and transition logic.
//!
//! The two dimensions are loosely coupled: booking status moves through
//! the reservation lifecycle, payment status tracks money collected.
//! Every transition goes through one validating gate here; callers never
//! write status fields ad hoc.

use crate::error::DomainError;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a booking.
///
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Reservation taken, awaiting confirmation
    Pending,
    /// Confirmed by full payment or an explicit operator action
    Confirmed,
    /// Cancelled directly or through an approved refund
    Cancelled,
    /// Departure has passed and the tour took place
    Completed,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBookingStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns true if a transition from this status to `new_status` is permitted.
    #[must_use]
    pub const fn can_transition_to(&self, new_status: Self) -> bool {
        matches!(
            (self, new_status),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if self.can_transition_to(new_status) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle rules".to_string(),
            })
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Payment states of a booking, recomputed from the cumulative amount
/// collected and moved to `Refunded` only by an approved refund decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing collected yet
    Pending,
    /// Some money collected, less than the total
    Partial,
    /// Cumulative payments cover the total amount
    Paid,
    /// An approved refund settled the money back
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPaymentStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Refunded)
    }

    /// Derives the payment status from amounts collected so far.
    ///
    /// Cumulative payments only ever grow, so the derived status is
    /// monotone: it never steps backwards across successive recomputes.
    #[must_use]
    pub fn for_amounts(paid: Money, total: Money) -> Self {
        if !total.is_zero() && paid >= total {
            Self::Paid
        } else if paid.is_zero() {
            Self::Pending
        } else if paid < total {
            Self::Partial
        } else {
            Self::Paid
        }
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = matches!(
            (self, new_status),
            (Self::Pending, Self::Partial | Self::Paid)
                | (Self::Partial, Self::Paid)
                | (Self::Paid, Self::Refunded)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by payment lifecycle rules".to_string(),
            })
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_string_round_trip() {
        let statuses = vec![
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ];

        for status in statuses {
            let s = status.as_str();
            match BookingStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_payment_status_string_round_trip() {
        let statuses = vec![
            PaymentStatus::Pending,
            PaymentStatus::Partial,
            PaymentStatus::Paid,
            PaymentStatus::Refunded,
        ];

        for status in statuses {
            let s = status.as_str();
            match PaymentStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_strings() {
        assert!(BookingStatus::parse_str("archived").is_err());
        assert!(PaymentStatus::parse_str("overpaid").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());

        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Partial.is_terminal());
        assert!(!PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
    }

    #[test]
    fn test_valid_booking_transitions() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Confirmed)
                .is_ok()
        );
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Completed)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_booking_transitions() {
        assert!(
            BookingStatus::Pending
                .validate_transition(BookingStatus::Completed)
                .is_err()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_terminal_booking_states() {
        let terminal_states = vec![BookingStatus::Cancelled, BookingStatus::Completed];

        for terminal in terminal_states {
            assert!(
                terminal
                    .validate_transition(BookingStatus::Confirmed)
                    .is_err()
            );
            assert!(
                terminal
                    .validate_transition(BookingStatus::Cancelled)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_payment_transitions() {
        assert!(
            PaymentStatus::Pending
                .validate_transition(PaymentStatus::Partial)
                .is_ok()
        );
        assert!(
            PaymentStatus::Pending
                .validate_transition(PaymentStatus::Paid)
                .is_ok()
        );
        assert!(
            PaymentStatus::Partial
                .validate_transition(PaymentStatus::Paid)
                .is_ok()
        );
        assert!(
            PaymentStatus::Paid
                .validate_transition(PaymentStatus::Refunded)
                .is_ok()
        );

        assert!(
            PaymentStatus::Pending
                .validate_transition(PaymentStatus::Refunded)
                .is_err()
        );
        assert!(
            PaymentStatus::Partial
                .validate_transition(PaymentStatus::Refunded)
                .is_err()
        );
        assert!(
            PaymentStatus::Refunded
                .validate_transition(PaymentStatus::Paid)
                .is_err()
        );
    }

    #[test]
    fn test_for_amounts() {
        let total = Money::new(1_000_000).unwrap();

        assert_eq!(
            PaymentStatus::for_amounts(Money::zero(), total),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentStatus::for_amounts(Money::new(400_000).unwrap(), total),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::for_amounts(total, total),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentStatus::for_amounts(Money::new(1_200_000).unwrap(), total),
            PaymentStatus::Paid
        );
    }
}
