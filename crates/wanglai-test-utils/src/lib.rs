// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators and an end-to-end harness for Wanglai tests.

pub mod harness;
pub mod mock_backend;
pub mod mock_store;
pub mod mock_transport;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::{MockAssetHost, MockBackend, MockTranscriber};
pub use mock_store::MockStore;
pub use mock_transport::{MockTransport, Sent};
