// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

use libc::{c_int, c_ulong};
use nix::errno::Errno;
use nix::sys::ioctl::ioctl_num_type;
use std::io;
use std::os::unix::prelude::*;

// from include/uapi/linux/i2c-dev.h
pub const I2C_SLAVE: u16 = 0x0703;
pub const I2C_SLAVE_FORCE: u16 = 0x0706;
const I2C_FUNCS: u16 = 0x0705;

/// Largest 7-bit peripheral address
pub const I2C_ADDRESS_MAX: u16 = 0x7F;

bitflags! {
    /// Adapter capabilities as reported by the `I2C_FUNCS` ioctl
    ///
    /// Only the bits that matter for register access are named; the rest
    /// of the kernel's mask is dropped on conversion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct I2CFunctions: u32 {
        const PLAIN_I2C = 0x0000_0001;
        const TEN_BIT_ADDR = 0x0000_0002;
        const SMBUS_QUICK = 0x0001_0000;
        const SMBUS_READ_BYTE = 0x0002_0000;
        const SMBUS_WRITE_BYTE = 0x0004_0000;
        const SMBUS_READ_BYTE_DATA = 0x0008_0000;
        const SMBUS_WRITE_BYTE_DATA = 0x0010_0000;
        const SMBUS_READ_WORD_DATA = 0x0020_0000;
        const SMBUS_WRITE_WORD_DATA = 0x0040_0000;

        const SMBUS_BYTE = Self::SMBUS_READ_BYTE.bits() | Self::SMBUS_WRITE_BYTE.bits();
        const SMBUS_REGISTERS = Self::SMBUS_READ_BYTE_DATA.bits()
            | Self::SMBUS_WRITE_BYTE_DATA.bits()
            | Self::SMBUS_READ_WORD_DATA.bits()
            | Self::SMBUS_WRITE_WORD_DATA.bits();
    }
}

impl I2CFunctions {
    /// Whether the adapter passes plain read()/write() through as i2c
    /// messages, which is all the register protocol needs
    pub fn supports_plain_i2c(&self) -> bool {
        self.contains(I2CFunctions::PLAIN_I2C)
    }

    /// Whether the adapter has native 8 and 16-bit SMBus register transfers
    pub fn supports_smbus_registers(&self) -> bool {
        self.contains(I2CFunctions::SMBUS_REGISTERS)
    }
}

mod ioctl {
    use super::I2C_FUNCS;

    ioctl_read_bad!(get_funcs, I2C_FUNCS, libc::c_ulong);
}

/// Bind `address` to `fd` using the platform's request code
///
/// The request is not fixed here; callers pass whichever `I2C_SLAVE`
/// value their target's headers define.
pub fn i2c_bind_address(fd: RawFd, request: u16, address: u16) -> Result<(), Errno> {
    let res = unsafe { libc::ioctl(fd, request as ioctl_num_type, c_int::from(address)) };
    Errno::result(res).map(drop)
}

pub fn i2c_get_functionality(fd: RawFd) -> Result<I2CFunctions, Errno> {
    let mut funcs: c_ulong = 0;
    unsafe {
        ioctl::get_funcs(fd, &mut funcs)?;
    }
    Ok(I2CFunctions::from_bits_truncate(funcs as u32))
}

/// Release `fd`, reporting the kernel's verdict
pub fn close(fd: RawFd) -> io::Result<()> {
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
