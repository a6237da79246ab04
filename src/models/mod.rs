// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod session;
pub mod token;

pub use session::SessionResponse;
pub use token::{RefreshRequest, TokenEnvelope, TokenPayload};
