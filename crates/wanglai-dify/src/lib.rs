// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational backend client.

pub mod client;
pub mod types;

pub use client::{DifyClient, IMAGE_UNREACHABLE_REPLY, RESET_REPLY};
