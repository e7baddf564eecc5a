// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;
use wayfare_domain::{
    BookingStatus, DomainError, Money, PaymentMethod, PaymentStatus, RefundDecision,
};
use wayfare_events::BookingEvent;

use crate::BookingError;
use crate::tests::helpers::{
    TOUR_ID, create_paid_booking, create_test_booking, create_test_engine, create_test_request,
    pay_in_full, test_departure, test_start,
};

#[test]
fn test_request_refund_stores_pending_request() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();

    let refund = engine.request_refund(booking_id, "family emergency").unwrap();

    // Seventeen days out lands in the 15-19 day tier of the graduated
    // ladder: 70% of 1,500,000.
    assert_eq!(refund.days_until_departure, 17);
    assert_eq!(refund.percentage, 70);
    assert_eq!(refund.amount, Money::new(1_050_000).unwrap());
    assert_eq!(refund.tier_label, "15-19 days");
    assert_eq!(refund.requested_at, test_start());
    assert_eq!(refund.reason, "family emergency");
    assert!(refund.decision.is_none());
    assert!(refund.decided_at.is_none());

    // Nothing else moves until the request is decided.
    let booking = engine.booking(booking_id).unwrap();
    assert_eq!(booking.booking_status, BookingStatus::Confirmed);
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(booking.refund, Some(refund));
    let usage = engine.departure_usage(TOUR_ID, test_departure()).unwrap();
    assert_eq!(usage.reserved, 2);
}

#[test]
fn test_refund_quote_prices_from_days_remaining() {
    let (engine, clock) = create_test_engine();
    let mut request = create_test_request();
    request.total_amount = Money::new(1_000_000).unwrap();
    request.deposit_amount = Money::zero();
    let created = engine.create_booking(request).unwrap();
    let booking_id: i64 = created.booking_id.unwrap();
    pay_in_full(&engine, booking_id);

    // Midday, nine and a half days before the departure's midnight:
    // partial days round up to 10.
    clock.set(datetime!(2026-09-08 12:00 UTC));
    let refund = engine.request_refund(booking_id, "change of plans").unwrap();

    assert_eq!(refund.days_until_departure, 10);
    assert_eq!(refund.percentage, 60);
    assert_eq!(refund.amount, Money::new(600_000).unwrap());
    assert_eq!(refund.tier_label, "10-14 days");
    assert_eq!(refund.requested_at, datetime!(2026-09-08 12:00 UTC));
}

#[test]
fn test_refund_requires_confirmed_booking() {
    let (engine, _clock) = create_test_engine();
    let created = create_test_booking(&engine);

    let result = engine.request_refund(created.booking_id.unwrap(), "changed my mind");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "request_refund",
            ..
        }
    ));
}

#[test]
fn test_refund_requires_full_payment() {
    let (engine, _clock) = create_test_engine();
    let created = create_test_booking(&engine);
    let booking_id: i64 = created.booking_id.unwrap();
    engine
        .record_payment(
            booking_id,
            Money::new(500_000).unwrap(),
            PaymentMethod::Cash,
            "TXN-DEP",
        )
        .unwrap();
    engine.confirm_booking(booking_id).unwrap();

    let result = engine.request_refund(booking_id, "changed my mind");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "request_refund",
            ..
        }
    ));
}

#[test]
fn test_second_refund_request_is_rejected() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    let first = engine.request_refund(booking_id, "family emergency").unwrap();

    let result = engine.request_refund(booking_id, "second thoughts");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "request_refund",
            ..
        }
    ));
    let booking = engine.booking(booking_id).unwrap();
    assert_eq!(booking.refund, Some(first));
}

#[test]
fn test_refund_request_survives_rejection_exactly_once() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    engine
        .decide_refund(booking_id, RefundDecision::Rejected)
        .unwrap();

    // A decided refund still counts as the one request this booking gets.
    let result = engine.request_refund(booking_id, "trying again");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "request_refund",
            ..
        }
    ));
}

#[test]
fn test_refund_after_departure_is_rejected() {
    let (engine, clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    clock.set(datetime!(2026-09-18 06:00 UTC));

    let result = engine.request_refund(booking_id, "we missed the bus");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "request_refund",
            ..
        }
    ));
    assert!(engine.booking(booking_id).unwrap().refund.is_none());
}

#[test]
fn test_blank_refund_reason_is_rejected() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);

    let result = engine.request_refund(paid.booking_id.unwrap(), "  ");

    assert!(matches!(
        result.unwrap_err(),
        BookingError::DomainViolation(DomainError::EmptyReason)
    ));
}

#[test]
fn test_refund_for_unknown_booking_fails() {
    let (engine, _clock) = create_test_engine();

    let result = engine.request_refund(999, "no such booking");

    assert!(matches!(result.unwrap_err(), BookingError::NotFound(_)));
}

#[test]
fn test_approving_a_refund_settles_and_cancels() {
    let (engine, clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    let mut events = engine.events().subscribe();
    clock.set(datetime!(2026-09-02 09:00 UTC));

    let booking = engine
        .decide_refund(booking_id, RefundDecision::Approved)
        .unwrap();

    assert_eq!(booking.booking_status, BookingStatus::Cancelled);
    assert_eq!(booking.payment_status, PaymentStatus::Refunded);
    assert_eq!(booking.cancelled_at, Some(datetime!(2026-09-02 09:00 UTC)));
    // The refund record is the audit trail; no operator is written back.
    assert!(booking.cancelled_by.is_none());
    assert!(booking.cancellation_reason.is_none());

    let refund = booking.refund.unwrap();
    assert_eq!(refund.decision, Some(RefundDecision::Approved));
    assert_eq!(refund.decided_at, Some(datetime!(2026-09-02 09:00 UTC)));

    let usage = engine.departure_usage(TOUR_ID, test_departure()).unwrap();
    assert_eq!(usage.reserved, 0);
    assert_eq!(
        events.try_recv().unwrap(),
        BookingEvent::RefundApproved {
            booking_id,
            code: paid.code,
            amount: 1_050_000,
            percentage: 70,
        }
    );
}

#[test]
fn test_rejecting_a_refund_only_records_the_decision() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    let mut events = engine.events().subscribe();

    let booking = engine
        .decide_refund(booking_id, RefundDecision::Rejected)
        .unwrap();

    assert_eq!(booking.booking_status, BookingStatus::Confirmed);
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert!(booking.cancelled_at.is_none());
    let refund = booking.refund.unwrap();
    assert_eq!(refund.decision, Some(RefundDecision::Rejected));
    assert!(refund.decided_at.is_some());

    // The seats stay sold.
    let usage = engine.departure_usage(TOUR_ID, test_departure()).unwrap();
    assert_eq!(usage.reserved, 2);
    assert_eq!(
        events.try_recv().unwrap(),
        BookingEvent::RefundRejected {
            booking_id,
            code: paid.code,
        }
    );
}

#[test]
fn test_deciding_without_a_request_fails() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);

    let result = engine.decide_refund(paid.booking_id.unwrap(), RefundDecision::Approved);

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "decide_refund",
            ..
        }
    ));
}

#[test]
fn test_deciding_twice_fails() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    engine
        .decide_refund(booking_id, RefundDecision::Approved)
        .unwrap();

    let result = engine.decide_refund(booking_id, RefundDecision::Approved);

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "decide_refund",
            ..
        }
    ));
    let booking = engine.booking(booking_id).unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Refunded);
}

#[test]
fn test_rejection_cannot_be_flipped_to_approval() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    engine
        .decide_refund(booking_id, RefundDecision::Rejected)
        .unwrap();

    let result = engine.decide_refund(booking_id, RefundDecision::Approved);

    assert!(matches!(
        result.unwrap_err(),
        BookingError::InvalidState {
            operation: "decide_refund",
            ..
        }
    ));
    let booking = engine.booking(booking_id).unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(booking.booking_status, BookingStatus::Confirmed);
}

#[test]
fn test_approval_after_direct_cancellation_still_settles() {
    let (engine, _clock) = create_test_engine();
    let paid = create_paid_booking(&engine);
    let booking_id: i64 = paid.booking_id.unwrap();
    engine.request_refund(booking_id, "family emergency").unwrap();
    let cancelled = engine
        .cancel_booking(booking_id, "ops@wayfare", "customer asked by phone")
        .unwrap();

    let booking = engine
        .decide_refund(booking_id, RefundDecision::Approved)
        .unwrap();

    // Already cancelled: the money settles, the cancellation record stays.
    assert_eq!(booking.booking_status, BookingStatus::Cancelled);
    assert_eq!(booking.payment_status, PaymentStatus::Refunded);
    assert_eq!(booking.cancelled_at, cancelled.cancelled_at);
    assert_eq!(booking.cancelled_by.as_deref(), Some("ops@wayfare"));
    assert_eq!(
        booking.cancellation_reason.as_deref(),
        Some("customer asked by phone")
    );

    // The direct cancellation already released the seats; approval does
    // not release them twice.
    let usage = engine.departure_usage(TOUR_ID, test_departure()).unwrap();
    assert_eq!(usage.reserved, 0);
}
