// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

use crate::logging::WireLog;
use nix::errno::Errno;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error that occured while performing an I2C operation
#[derive(Debug, Error)]
pub enum I2CError {
    /// The bus device node is missing or could not be opened read/write
    #[error("unable to open i2c device node {}: {source}", .path.display())]
    DeviceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel rejected binding the peripheral address to the handle
    #[error("unable to bind i2c address 0x{address:02x}: {source}")]
    BindFailed {
        address: u16,
        #[source]
        source: Errno,
    },

    /// A raw transfer failed
    #[error("i2c transfer failed: {0}")]
    Io(#[from] io::Error),

    /// The connection was already closed
    #[error("i2c connection is closed")]
    ClosedHandle,
}

/// Flat classification of an `I2CError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2CErrorKind {
    DeviceNotFound,
    BindFailed,
    Io,
    ClosedHandle,
}

impl I2CError {
    pub fn kind(&self) -> I2CErrorKind {
        match *self {
            I2CError::DeviceNotFound { .. } => I2CErrorKind::DeviceNotFound,
            I2CError::BindFailed { .. } => I2CErrorKind::BindFailed,
            I2CError::Io(_) => I2CErrorKind::Io,
            I2CError::ClosedHandle => I2CErrorKind::ClosedHandle,
        }
    }
}

/// Result of an I2C Operation
pub type I2CResult<T> = Result<T, I2CError>;

/// Interface to an I2C peripheral from an I2C master
///
/// Implementations are bound to exactly one peripheral address for
/// their whole lifetime, following the Linux i2c-dev model where a file
/// descriptor is associated with a single device address.  Register
/// level access is layered on top by `SMBusRegisters`.
pub trait I2CDevice {
    /// Read data from the device into the provided slice
    ///
    /// Returns the number of bytes actually read.  Short reads are
    /// reported through the count and are not an error.
    fn read(&mut self, data: &mut [u8]) -> I2CResult<usize>;

    /// Write the provided buffer to the device
    ///
    /// Returns the number of bytes the transport accepted.  Nothing is
    /// retried.
    fn write(&mut self, data: &[u8]) -> I2CResult<usize>;

    /// Logger receiving this device's wire and register traffic
    fn wire_log(&self) -> &WireLog;

    /// Read up to `count` bytes, returning only the bytes received
    fn read_bytes(&mut self, count: usize) -> I2CResult<Vec<u8>> {
        let mut buf = vec![0; count];
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

impl<'a, T: I2CDevice + ?Sized> I2CDevice for &'a mut T {
    fn read(&mut self, data: &mut [u8]) -> I2CResult<usize> {
        (**self).read(data)
    }

    fn write(&mut self, data: &[u8]) -> I2CResult<usize> {
        (**self).write(data)
    }

    fn wire_log(&self) -> &WireLog {
        (**self).wire_log()
    }
}
