// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapdoc — Core types, error definitions, and configuration shared across crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::SnapConfig;
pub use error::{Result, SnapError};
pub use types::OutputMode;
