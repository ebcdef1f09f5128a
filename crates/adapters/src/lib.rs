// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! relay-adapters: the external command-line tool seam

pub mod wp;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use wp::{InvokeError, Invoker, WpCli};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWp;
