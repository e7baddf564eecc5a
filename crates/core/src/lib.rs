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

mod clock;
mod engine;
mod error;
mod locks;

#[cfg(test)]
mod tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::BookingEngine;
pub use error::BookingError;
