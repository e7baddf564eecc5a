// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A monetary amount in integer currency units.
///
/// Amounts are always non-negative; arithmetic that could go below zero
/// saturates at zero instead. The platform bills in whole currency units
/// (VND), so there is no fractional component to carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money {
    amount: i64,
}

impl Money {
    /// Creates a monetary amount.
    ///
    /// # Arguments
    /// * `amount` - The amount in integer currency units
    ///
    /// # Returns
    /// The validated amount
    ///
    /// # Errors
    /// Returns `DomainError::NegativeAmount` if `amount` is negative.
    pub const fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount { amount });
        }
        Ok(Self { amount })
    }

    /// Returns the zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self { amount: 0 }
    }

    /// Returns the raw value in integer currency units.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.amount
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Adds two amounts, saturating at `i64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            amount: self.amount.saturating_add(other.amount),
        }
    }

    /// Subtracts `other` from `self`, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let amount: i64 = self.amount - other.amount;
        Self {
            amount: if amount < 0 { 0 } else { amount },
        }
    }

    /// Applies a percentage, rounding half away from zero.
    ///
    /// The amount is never negative, so adding half the divisor before the
    /// truncating division yields the half-away-from-zero result.
    #[must_use]
    pub fn percentage_of(self, percentage: u8) -> Self {
        Self {
            amount: (self.amount * i64::from(percentage) + 50) / 100,
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount)
    }
}

/// The number of travellers on a booking.
///
/// Always at least one; this is the seat count reserved against the
/// departure's capacity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartySize {
    seats: u32,
}

impl PartySize {
    /// Creates a party size.
    ///
    /// # Arguments
    /// * `seats` - The number of travellers
    ///
    /// # Returns
    /// The validated party size
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPartySize` if `seats` is zero.
    pub const fn new(seats: u32) -> Result<Self, DomainError> {
        if seats == 0 {
            return Err(DomainError::InvalidPartySize { size: seats });
        }
        Ok(Self { seats })
    }

    /// Returns the seat count.
    #[must_use]
    pub const fn seats(&self) -> u32 {
        self.seats
    }
}

impl std::fmt::Display for PartySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.seats)
    }
}

/// Contact details for the person who placed a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    name: String,
    email: String,
    phone: String,
}

impl ContactInfo {
    /// Creates contact details, trimming surrounding whitespace.
    ///
    /// Field content is checked separately by
    /// [`validate_contact`](crate::validation::validate_contact).
    #[must_use]
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            phone: phone.trim().to_owned(),
        }
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}
