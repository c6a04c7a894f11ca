// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP entry point: signature-checked webhook intake and a health probe.

pub mod handlers;
pub mod server;

pub use handlers::SIGNATURE_HEADER;
pub use server::{GatewayState, ServerConfig, router, start_server};
