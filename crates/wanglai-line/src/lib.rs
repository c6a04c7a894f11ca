// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API integration: outbound transport, webhook payload
//! types, and signature verification.

pub mod client;
pub mod message;
pub mod signature;
pub mod webhook;

pub use client::LineClient;
pub use signature::LineSignatureVerifier;
pub use webhook::{EventMessage, EventSource, WebhookEvent, WebhookPayload};
