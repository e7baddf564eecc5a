// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation for incoming booking data.

use time::Date;

use crate::booking::BookingRequest;
use crate::error::DomainError;
use crate::types::{ContactInfo, Money};

/// Validates a booking request before any capacity is reserved.
///
/// # Arguments
/// * `request` - The incoming request
/// * `today` - The current date, injected by the caller's clock
///
/// # Errors
///
/// Returns an error if the departure is not strictly in the future, the
/// deposit exceeds the total, or the contact details are malformed.
pub fn validate_booking_request(request: &BookingRequest, today: Date) -> Result<(), DomainError> {
    if request.departure_date <= today {
        return Err(DomainError::DepartureNotInFuture {
            departure_date: request.departure_date,
        });
    }

    if request.deposit_amount > request.total_amount {
        return Err(DomainError::DepositExceedsTotal {
            deposit: request.deposit_amount.value(),
            total: request.total_amount.value(),
        });
    }

    validate_contact(&request.contact)
}

/// Validates contact details.
///
/// # Errors
///
/// Returns `DomainError::InvalidContact` naming the offending field if
/// the name is blank, the email has no user or host part, or the phone
/// number carries fewer than six digits.
pub fn validate_contact(contact: &ContactInfo) -> Result<(), DomainError> {
    if contact.name().is_empty() {
        return Err(DomainError::InvalidContact {
            field: "name",
            reason: "cannot be empty".to_string(),
        });
    }

    let email: &str = contact.email();
    let valid_email: bool = match email.split_once('@') {
        Some((user, host)) => !user.is_empty() && !host.is_empty(),
        None => false,
    };
    if !valid_email {
        return Err(DomainError::InvalidContact {
            field: "email",
            reason: format!("'{email}' is not a plausible address"),
        });
    }

    let digits: usize = contact
        .phone()
        .chars()
        .filter(char::is_ascii_digit)
        .count();
    if digits < 6 {
        return Err(DomainError::InvalidContact {
            field: "phone",
            reason: "must contain at least six digits".to_string(),
        });
    }

    Ok(())
}

/// Validates that a payment moves a positive amount.
///
/// # Errors
///
/// Returns `DomainError::InvalidPaymentAmount` for a zero amount.
pub fn validate_payment_amount(amount: Money) -> Result<(), DomainError> {
    if amount.is_zero() {
        return Err(DomainError::InvalidPaymentAmount {
            amount: amount.value(),
        });
    }
    Ok(())
}

/// Validates a payment transaction id.
///
/// # Errors
///
/// Returns `DomainError::EmptyTransactionId` if the id is blank.
pub fn validate_transaction_id(transaction_id: &str) -> Result<(), DomainError> {
    if transaction_id.trim().is_empty() {
        return Err(DomainError::EmptyTransactionId);
    }
    Ok(())
}

/// Validates a free-text reason for a cancellation or refund request.
///
/// # Errors
///
/// Returns `DomainError::EmptyReason` if the reason is blank.
pub fn validate_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::EmptyReason);
    }
    Ok(())
}

/// Validates the actor recorded on a direct cancellation.
///
/// # Errors
///
/// Returns `DomainError::EmptyCancelledBy` if the actor is blank.
pub fn validate_cancelled_by(cancelled_by: &str) -> Result<(), DomainError> {
    if cancelled_by.trim().is_empty() {
        return Err(DomainError::EmptyCancelledBy);
    }
    Ok(())
}
