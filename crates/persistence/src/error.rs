// Copyright (C) 2026 Wayfare Systems
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested booking id was not found.
    BookingNotFound(i64),
    /// The requested booking code was not found.
    CodeNotFound(String),
    /// A booking with this code already exists.
    DuplicateCode(String),
    /// The booking has no id and therefore was never persisted.
    MissingId,
    /// The storage backend is unavailable.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookingNotFound(id) => write!(f, "Booking not found: {id}"),
            Self::CodeNotFound(code) => write!(f, "Booking code not found: {code}"),
            Self::DuplicateCode(code) => {
                write!(f, "A booking with code {code} already exists")
            }
            Self::MissingId => write!(f, "Booking has no id and cannot be updated"),
            Self::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
