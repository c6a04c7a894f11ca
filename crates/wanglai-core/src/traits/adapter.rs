// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that every external collaborator implements.

use async_trait::async_trait;

use crate::error::WanglaiError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all collaborator adapters.
///
/// Provides identity, lifecycle, and health check capabilities so the
/// binary can report on every wired collaborator the same way.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role this adapter plays.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, WanglaiError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), WanglaiError>;
}
