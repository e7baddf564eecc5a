// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment and refund records attached to a booking.
//!
//! `payments` is an append-only trail; entries are never edited or
//! removed. Refund information is written at most once per booking and
//! decided at most once after that.

use crate::error::DomainError;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// How a payment was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the office
    Cash,
    /// Domestic bank transfer
    BankTransfer,
    /// Credit or debit card
    CreditCard,
    /// Mobile wallet
    EWallet,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
            Self::EWallet => "e_wallet",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "credit_card" => Ok(Self::CreditCard),
            "e_wallet" => Ok(Self::EWallet),
            _ => Err(DomainError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Outcome of a single payment attempt.
///
/// The engine only appends `Completed` captures; `Failed` attempts can be
/// imported by outer layers and are ignored when summing money collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEntryStatus {
    /// The money was captured
    Completed,
    /// The attempt failed at the gateway
    Failed,
}

/// One entry in a booking's append-only payment trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub amount: Money,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub status: PaymentEntryStatus,
    pub paid_at: OffsetDateTime,
}

impl PaymentEntry {
    /// Creates a completed (captured) payment entry.
    #[must_use]
    pub const fn completed(
        amount: Money,
        method: PaymentMethod,
        transaction_id: String,
        paid_at: OffsetDateTime,
    ) -> Self {
        Self {
            amount,
            method,
            transaction_id,
            status: PaymentEntryStatus::Completed,
            paid_at,
        }
    }

    /// Returns true if this entry captured money.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, PaymentEntryStatus::Completed)
    }
}

/// Decision taken on a refund request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundDecision {
    /// The refund will be paid out
    Approved,
    /// The request was declined
    Rejected,
}

impl RefundDecision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidRefundDecision(s.to_string())),
        }
    }
}

impl std::fmt::Display for RefundDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RefundDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The refund attached to a booking, written at most once.
///
/// Created pending (`decision = None`) when the customer requests a
/// refund; `decided_at`/`decision` are filled exactly once by the decide
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundInfo {
    pub requested_at: OffsetDateTime,
    pub days_until_departure: i64,
    pub percentage: u8,
    pub amount: Money,
    pub tier_label: String,
    pub reason: String,
    pub decided_at: Option<OffsetDateTime>,
    pub decision: Option<RefundDecision>,
}

impl RefundInfo {
    /// Creates a pending refund request.
    #[must_use]
    pub const fn pending(
        requested_at: OffsetDateTime,
        days_until_departure: i64,
        percentage: u8,
        amount: Money,
        tier_label: String,
        reason: String,
    ) -> Self {
        Self {
            requested_at,
            days_until_departure,
            percentage,
            amount,
            tier_label,
            reason,
            decided_at: None,
            decision: None,
        }
    }

    /// Returns true if a decision has been recorded.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        self.decision.is_some()
    }
}
