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

//! Booking lifecycle events and the dispatcher that fans them out.
//!
//! Events are emitted after a state transition has committed and are
//! purely informational: the mail and in-app notification layers
//! subscribe here, and nothing in the booking core ever waits on them.
//! A notification that goes undelivered is logged and forgotten; it can
//! never fail or roll back the operation that produced it.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of events to buffer in the broadcast channel.
/// If subscribers cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Notification events produced by booking state transitions.
///
/// The serialized shape is the notification contract:
/// `{"type": "<event>", "bookingId": …, …}` with camelCase payload
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookingEvent {
    /// A booking reached `confirmed`, by full payment or operator action.
    #[serde(rename = "booking.confirmed")]
    #[serde(rename_all = "camelCase")]
    BookingConfirmed {
        /// The booking's canonical id.
        booking_id: i64,
        /// The booking's human-readable code.
        code: String,
    },
    /// A refund request was approved and the booking cancelled.
    #[serde(rename = "refund.approved")]
    #[serde(rename_all = "camelCase")]
    RefundApproved {
        /// The booking's canonical id.
        booking_id: i64,
        /// The booking's human-readable code.
        code: String,
        /// Refund amount in integer currency units.
        amount: i64,
        /// Refund percentage granted by the matched tier.
        percentage: u8,
    },
    /// A refund request was declined; the booking stands.
    #[serde(rename = "refund.rejected")]
    #[serde(rename_all = "camelCase")]
    RefundRejected {
        /// The booking's canonical id.
        booking_id: i64,
        /// The booking's human-readable code.
        code: String,
    },
    /// The departure passed and the booking was completed.
    #[serde(rename = "booking.completed")]
    #[serde(rename_all = "camelCase")]
    BookingCompleted {
        /// The booking's canonical id.
        booking_id: i64,
        /// The booking's human-readable code.
        code: String,
    },
}

/// Fan-out channel between the booking core and notification consumers.
///
/// A lightweight wrapper around `tokio::sync::broadcast`; dispatching
/// never blocks and never fails the caller.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    tx: broadcast::Sender<BookingEvent>,
}

impl EventDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Dispatches an event to all current subscribers.
    ///
    /// If no subscribers exist the event is dropped; this is fire-and-
    /// forget by design and the outcome is only logged.
    pub fn dispatch(&self, event: &BookingEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "dispatched booking event");
            }
            Err(_) => {
                // No receivers, which is fine
                debug!(?event, "no receivers for booking event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Returns a receiver for all future events; events dispatched
    /// before subscribing are not replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
