// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Injected logging capability for the snap pipeline.
//
// The pipeline never reads ambient global state for diagnostics; callers
// hand it a logger explicitly. Messages are advisory only and never affect
// control flow or the returned value.

use std::sync::{Arc, Mutex};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Warn,
    Error,
}

/// Logging capability handed to the pipeline.
///
/// Implementations must be cheap to call; the pipeline emits intermediate
/// measurements (candidate contour areas, corner coordinates, warp
/// dimensions) at `Debug` and below.
pub trait SnapLogger {
    fn log(&self, level: LogLevel, message: &str);

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Forwards pipeline diagnostics to the `tracing` macros.
///
/// This is the default logger; whichever subscriber the host application
/// installed decides what actually gets emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SnapLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "snapdoc", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "snapdoc", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "snapdoc", "{message}"),
            LogLevel::Error => tracing::error!(target: "snapdoc", "{message}"),
        }
    }
}

/// Records every message for later inspection.
///
/// Clones share the same backing store, so a test can keep one handle and
/// give the other to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct CapturingLogger {
    entries: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().expect("capturing logger mutex poisoned").clone()
    }

    /// True if any message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl SnapLogger for CapturingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .expect("capturing logger mutex poisoned")
            .push((level, message.to_owned()));
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl SnapLogger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}
