// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-connection wire logging
//!
//! Every connection owns a `WireLog`.  The log level is chosen when the
//! connection is built, so two connections in the same process can trace
//! at different levels (or not at all) without any shared state.  Events
//! are emitted through `tracing` inside an `i2c` span carrying the bus
//! index and peripheral address.

use std::fmt;
use std::path::Path;
use tracing::{Level, Span};

/// Emit an event at a level only known at runtime
macro_rules! wire_event {
    ($log:expr, $($arg:tt)+) => {
        if let Some(level) = $log.level {
            let span = &$log.span;
            if level == Level::ERROR {
                tracing::error!(parent: span, $($arg)+);
            } else if level == Level::WARN {
                tracing::warn!(parent: span, $($arg)+);
            } else if level == Level::INFO {
                tracing::info!(parent: span, $($arg)+);
            } else if level == Level::DEBUG {
                tracing::debug!(parent: span, $($arg)+);
            } else {
                tracing::trace!(parent: span, $($arg)+);
            }
        }
    };
}

/// Lowercase hex rendering of a byte slice
pub struct Hex<'a>(pub &'a [u8]);

impl<'a> fmt::Display for Hex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Register address rendered as `0x..`
struct Reg(u8);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Logger collaborator attached to a single connection
#[derive(Debug, Clone)]
pub struct WireLog {
    level: Option<Level>,
    span: Span,
}

impl Default for WireLog {
    fn default() -> WireLog {
        WireLog::disabled()
    }
}

impl WireLog {
    /// Create a log for the peripheral at `address` on `bus`
    ///
    /// `level` is the level wire traffic is reported at; `None` keeps the
    /// connection silent.
    pub fn new(level: Option<Level>, bus: u32, address: u16) -> WireLog {
        WireLog {
            level,
            span: tracing::info_span!("i2c", bus, addr = address),
        }
    }

    /// A log that never emits anything
    pub fn disabled() -> WireLog {
        WireLog {
            level: None,
            span: Span::none(),
        }
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn is_enabled(&self) -> bool {
        self.level.is_some()
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn opened(&self, path: &Path) {
        wire_event!(self, path = %path.display(), "opened");
    }

    pub fn closed(&self) {
        wire_event!(self, "closed");
    }

    pub fn write(&self, data: &[u8]) {
        wire_event!(self, len = data.len(), bytes = %Hex(data), "write");
    }

    pub fn read(&self, data: &[u8]) {
        wire_event!(self, len = data.len(), bytes = %Hex(data), "read");
    }

    pub fn register_block(&self, register: u8, count: usize) {
        wire_event!(self, register = %Reg(register), count, "read block");
    }

    pub fn register_read<V: fmt::Display>(&self, register: u8, width: &'static str, value: V) {
        wire_event!(
            self,
            register = %Reg(register),
            width,
            value = %value,
            "read register"
        );
    }

    pub fn register_write<V: fmt::Display>(&self, register: u8, width: &'static str, value: V) {
        wire_event!(
            self,
            register = %Reg(register),
            width,
            value = %value,
            "write register"
        );
    }
}
