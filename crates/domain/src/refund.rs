// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Refund policy tables and the cancellation quote calculator.
//!
//! A policy is one ordered table of (minimum days, percentage) tiers,
//! evaluated top-down with the first matching tier winning. Zero or
//! negative days until departure always refund nothing, regardless of
//! the table. The calculator is pure: it reads nothing but its inputs.

use crate::error::DomainError;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

/// Tier label used when the departure is today or already behind us.
const DEPARTED_LABEL: &str = "departed";

/// Tier label used when the cancellation is too close to qualify for any tier.
const NO_REFUND_LABEL: &str = "no refund window";

/// One row of a refund ladder: cancellations at least `min_days` ahead
/// of departure refund `percentage` of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundTier {
    min_days: i64,
    percentage: u8,
    label: String,
}

impl RefundTier {
    /// Creates a tier row.
    #[must_use]
    pub fn new(min_days: i64, percentage: u8, label: &str) -> Self {
        Self {
            min_days,
            percentage,
            label: label.to_owned(),
        }
    }

    /// Returns the minimum days-until-departure for this tier.
    #[must_use]
    pub const fn min_days(&self) -> i64 {
        self.min_days
    }

    /// Returns the refund percentage granted by this tier.
    #[must_use]
    pub const fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Returns the customer-facing tier label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The result of pricing a cancellation against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefundQuote {
    pub days_until_departure: i64,
    pub percentage: u8,
    pub amount: Money,
    pub tier_label: String,
}

/// An ordered refund ladder, validated at construction.
///
/// Deployments may ship their own table; the two ladders the platform has
/// historically used are available as [`RefundPolicy::standard`] and
/// [`RefundPolicy::graduated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRefundPolicy")]
pub struct RefundPolicy {
    name: String,
    tiers: Vec<RefundTier>,
}

/// Unvalidated mirror of [`RefundPolicy`] used for deserialization.
#[derive(Debug, Deserialize)]
struct RawRefundPolicy {
    name: String,
    tiers: Vec<RefundTier>,
}

impl TryFrom<RawRefundPolicy> for RefundPolicy {
    type Error = DomainError;

    fn try_from(raw: RawRefundPolicy) -> Result<Self, Self::Error> {
        Self::new(&raw.name, raw.tiers)
    }
}

impl RefundPolicy {
    /// Creates a policy from an ordered tier table.
    ///
    /// # Arguments
    /// * `name` - Deployment-facing policy name, used in logs
    /// * `tiers` - Tier rows ordered from the highest threshold down
    ///
    /// # Returns
    /// The validated policy
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRefundPolicy` if the table is empty,
    /// a percentage exceeds 100, a threshold is below one day, thresholds
    /// are not strictly descending, or percentages increase as departure
    /// approaches.
    pub fn new(name: &str, tiers: Vec<RefundTier>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::InvalidRefundPolicy {
                reason: "tier table cannot be empty".to_string(),
            });
        }

        for pair in tiers.windows(2) {
            if pair[1].min_days >= pair[0].min_days {
                return Err(DomainError::InvalidRefundPolicy {
                    reason: format!(
                        "tier thresholds must be strictly descending, found {} after {}",
                        pair[1].min_days, pair[0].min_days
                    ),
                });
            }
            if pair[1].percentage > pair[0].percentage {
                return Err(DomainError::InvalidRefundPolicy {
                    reason: format!(
                        "refund percentage cannot increase as departure approaches, found {}% after {}%",
                        pair[1].percentage, pair[0].percentage
                    ),
                });
            }
        }

        for tier in &tiers {
            if tier.percentage > 100 {
                return Err(DomainError::InvalidRefundPolicy {
                    reason: format!("percentage {} exceeds 100", tier.percentage),
                });
            }
            if tier.min_days < 1 {
                return Err(DomainError::InvalidRefundPolicy {
                    reason: format!(
                        "tier threshold {} is below one day; departures at or past \
                         the cancellation date never refund",
                        tier.min_days
                    ),
                });
            }
        }

        Ok(Self {
            name: name.to_owned(),
            tiers,
        })
    }

    /// The coarse legacy ladder: full refund a week or more ahead, half
    /// with three or more days of notice, nothing below that.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            name: String::from("standard"),
            tiers: vec![
                RefundTier::new(7, 100, "7+ days"),
                RefundTier::new(3, 50, "3-6 days"),
            ],
        }
    }

    /// The graduated ladder used by the customer-facing cancellation
    /// terms, stepping from 90% a month ahead down to 10% the day before.
    #[must_use]
    pub fn graduated() -> Self {
        Self {
            name: String::from("graduated"),
            tiers: vec![
                RefundTier::new(31, 90, "31+ days"),
                RefundTier::new(20, 80, "20-30 days"),
                RefundTier::new(15, 70, "15-19 days"),
                RefundTier::new(10, 60, "10-14 days"),
                RefundTier::new(3, 25, "3-9 days"),
                RefundTier::new(1, 10, "1-2 days"),
            ],
        }
    }

    /// Returns the policy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered tier table.
    #[must_use]
    pub fn tiers(&self) -> &[RefundTier] {
        &self.tiers
    }

    /// Finds the percentage and label for a days-until-departure value.
    fn tier_for(&self, days_until_departure: i64) -> (u8, &str) {
        if days_until_departure <= 0 {
            return (0, DEPARTED_LABEL);
        }
        for tier in &self.tiers {
            if days_until_departure >= tier.min_days {
                return (tier.percentage, &tier.label);
            }
        }
        (0, NO_REFUND_LABEL)
    }

    /// Prices a cancellation.
    ///
    /// # Arguments
    /// * `departure_date` - The tour's departure date
    /// * `cancellation_at` - The instant the cancellation is requested
    /// * `total_amount` - The booking's total amount
    ///
    /// # Returns
    /// The refund quote: days until departure (rounded up in the
    /// customer's favour), the matched tier's percentage and label, and
    /// the refund amount rounded half away from zero.
    #[must_use]
    pub fn quote(
        &self,
        departure_date: Date,
        cancellation_at: OffsetDateTime,
        total_amount: Money,
    ) -> RefundQuote {
        let days: i64 = days_until_departure(departure_date, cancellation_at);
        let (percentage, label) = self.tier_for(days);
        RefundQuote {
            days_until_departure: days,
            percentage,
            amount: total_amount.percentage_of(percentage),
            tier_label: label.to_owned(),
        }
    }
}

impl Default for RefundPolicy {
    /// The canonical deployment default is the graduated ladder.
    fn default() -> Self {
        Self::graduated()
    }
}

/// Whole days between a cancellation instant and the departure's first
/// midnight (UTC), rounded up so partial days count in the customer's
/// favour. Zero or negative means the departure is today or has passed.
#[must_use]
pub fn days_until_departure(departure_date: Date, at: OffsetDateTime) -> i64 {
    let departure_start: OffsetDateTime = departure_date.midnight().assume_utc();
    let seconds: i64 = (departure_start - at).whole_seconds();
    if seconds > 0 {
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    } else {
        // truncation toward zero is already the ceiling for negatives
        seconds / SECONDS_PER_DAY
    }
}
