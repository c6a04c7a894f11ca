// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media collaborators: speech-to-text and public image hosting.

pub mod asset;
pub mod transcribe;

pub use asset::CloudinaryHost;
pub use transcribe::OpenAiTranscriber;
