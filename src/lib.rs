// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

//! # i2creg
//!
//! The `i2creg` crate provides register level access to i2c peripherals
//! from Linux userspace.  It wraps the kernel's i2c-dev character device
//! interface:
//! https://www.kernel.org/doc/Documentation/i2c/dev-interface
//!
//! A `LinuxI2CBus` is bound to one peripheral address when opened.  The
//! `SMBusRegisters` trait layers 8 and 16-bit register reads and writes
//! on top of its raw transfers.
//!
//! ```rust,no_run
//! use i2creg::{LinuxI2CBus, SMBusRegisters};
//!
//! # fn main() -> Result<(), i2creg::I2CError> {
//! let mut dev = LinuxI2CBus::open(0x27, 2)?;
//! dev.write_reg_u8(0x01, 0xF3)?;
//! let word = dev.read_reg_u16_be(0x10)?;
//! println!("0x{:04x}", word);
//! dev.close()?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate nix;
#[macro_use]
extern crate bitflags;

pub mod config;
pub mod core;
pub mod ffi;
pub mod linux;
pub mod logging;
pub mod mock;
pub mod smbus;

pub use crate::config::{BusConfig, ConfigError};
pub use crate::core::{I2CDevice, I2CError, I2CErrorKind, I2CResult};
pub use crate::ffi::{I2CFunctions, I2C_SLAVE, I2C_SLAVE_FORCE};
pub use crate::linux::{AddressBinder, IoctlBinder, LinuxI2CBus};
pub use crate::logging::WireLog;
pub use crate::smbus::SMBusRegisters;
