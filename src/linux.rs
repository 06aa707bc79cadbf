// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

use crate::config::BusConfig;
use crate::core::{I2CDevice, I2CError, I2CResult};
use crate::ffi::{self, I2CFunctions, I2C_ADDRESS_MAX};
use crate::logging::WireLog;
use nix::errno::Errno;
use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::os::unix::prelude::*;

/// Performs the control call that binds a peripheral address to an
/// open bus handle
pub trait AddressBinder {
    fn bind(&self, fd: RawFd, request: u16, address: u16) -> Result<(), Errno>;
}

/// Binds through the i2c-dev ioctl
#[derive(Debug, Clone, Copy, Default)]
pub struct IoctlBinder;

impl AddressBinder for IoctlBinder {
    fn bind(&self, fd: RawFd, request: u16, address: u16) -> Result<(), Errno> {
        ffi::i2c_bind_address(fd, request, address)
    }
}

/// A connection to one peripheral on one Linux i2c bus
///
/// The kernel exposes one device node (e.g. `/dev/i2c-1`) per bus.  The
/// peripheral address is bound to the open handle once, when the
/// connection is opened, and every transfer afterwards targets it.  To
/// talk to several peripherals, open one connection per address.
///
/// A connection is not synchronized.  Register operations are a write
/// followed by a read, so callers sharing one between threads must
/// serialize whole operations, not just individual transfers.
#[derive(Debug)]
pub struct LinuxI2CBus {
    devfile: Option<File>,
    bus: u32,
    address: u16,
    log: WireLog,
}

impl LinuxI2CBus {
    /// Open `/dev/i2c-<bus>` and bind it to `address`
    pub fn open(address: u16, bus: u32) -> I2CResult<LinuxI2CBus> {
        LinuxI2CBus::open_with(&BusConfig::default(), address, bus)
    }

    /// Open a connection using the node prefix, bind request code and log
    /// level from `config`
    pub fn open_with(config: &BusConfig, address: u16, bus: u32) -> I2CResult<LinuxI2CBus> {
        LinuxI2CBus::open_with_binder(config, &IoctlBinder, address, bus)
    }

    /// Open a connection, binding the address through `binder`
    ///
    /// Addresses are 7-bit; anything above `0x7F` fails with `BindFailed`
    /// before the node is touched.
    pub fn open_with_binder<B>(
        config: &BusConfig,
        binder: &B,
        address: u16,
        bus: u32,
    ) -> I2CResult<LinuxI2CBus>
    where
        B: AddressBinder + ?Sized,
    {
        if address > I2C_ADDRESS_MAX {
            return Err(I2CError::BindFailed {
                address,
                source: Errno::EINVAL,
            });
        }

        let path = config.device_path(bus);
        let devfile = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| I2CError::DeviceNotFound {
                path: path.clone(),
                source,
            })?;

        binder
            .bind(devfile.as_raw_fd(), config.bind_request, address)
            .map_err(|source| I2CError::BindFailed { address, source })?;

        let log = WireLog::new(config.log_level, bus, address);
        log.opened(&path);
        Ok(LinuxI2CBus {
            devfile: Some(devfile),
            bus,
            address,
            log,
        })
    }

    /// Index of the bus this connection was opened on
    pub fn bus(&self) -> u32 {
        self.bus
    }

    /// Peripheral address bound to this connection
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn is_closed(&self) -> bool {
        self.devfile.is_none()
    }

    /// Release the device handle
    ///
    /// Closing twice, or transferring after a close, fails with
    /// `ClosedHandle`.
    pub fn close(&mut self) -> I2CResult<()> {
        let devfile = self.devfile.take().ok_or(I2CError::ClosedHandle)?;
        ffi::close(devfile.into_raw_fd())?;
        self.log.closed();
        Ok(())
    }

    /// Query which transfer types the bus adapter supports
    pub fn functionality(&self) -> I2CResult<I2CFunctions> {
        let devfile = self.devfile.as_ref().ok_or(I2CError::ClosedHandle)?;
        ffi::i2c_get_functionality(devfile.as_raw_fd())
            .map_err(|errno| I2CError::Io(errno.into()))
    }

    fn devfile(&mut self) -> I2CResult<&mut File> {
        self.devfile.as_mut().ok_or(I2CError::ClosedHandle)
    }
}

impl AsRawFd for LinuxI2CBus {
    fn as_raw_fd(&self) -> RawFd {
        self.devfile.as_ref().map_or(-1, |f| f.as_raw_fd())
    }
}

impl I2CDevice for LinuxI2CBus {
    fn read(&mut self, data: &mut [u8]) -> I2CResult<usize> {
        let n = self.devfile()?.read(data)?;
        self.log.read(&data[..n]);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> I2CResult<usize> {
        let devfile = self.devfile()?;
        let n = devfile.write(data)?;
        self.log.write(&data[..n]);
        Ok(n)
    }

    fn wire_log(&self) -> &WireLog {
        &self.log
    }
}
