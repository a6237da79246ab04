// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access and session handling.

pub mod backend;
pub mod proxy;
pub mod session;

pub use backend::{BackendClient, FormField, UpstreamBody, UpstreamRequest};
pub use session::SessionTokens;
