// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions over the ledger tables.

pub mod categories;
pub mod transactions;
