// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

//! SMBus style register access over plain i2c transfers
//!
//! Every read selects the register with a one byte write and then reads
//! the payload as a separate transfer.  Writes send the register and the
//! payload in a single transfer.  No SMBus ioctl is used, so this works on
//! any adapter that passes plain read()/write() through.
//!
//! Little endian variants reuse the big endian transfer and swap the
//! bytes of the resulting value (or of the value before writing).

use crate::core::{I2CDevice, I2CResult};
use byteorder::{BigEndian, ByteOrder};
use std::io;

fn short_read(expected: usize, actual: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("short register read: {} of {} bytes", actual, expected),
    )
}

fn short_write(expected: usize, actual: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::WriteZero,
        format!("short register write: {} of {} bytes", actual, expected),
    )
}

/// Register level operations available on every `I2CDevice`
pub trait SMBusRegisters: I2CDevice {
    /// Select `register` for a following read
    fn select_register(&mut self, register: u8) -> I2CResult<()> {
        let buf = [register];
        let n = self.write(&buf)?;
        if n != buf.len() {
            return Err(short_write(buf.len(), n).into());
        }
        Ok(())
    }

    /// Read up to `count` bytes starting at `register`
    ///
    /// The returned vector holds only the bytes the device delivered.
    fn read_reg_bytes(&mut self, register: u8, count: usize) -> I2CResult<Vec<u8>> {
        self.wire_log().register_block(register, count);
        self.select_register(register)?;
        self.read_bytes(count)
    }

    /// Read exactly `buf.len()` bytes starting at `register`
    fn read_reg_exact(&mut self, register: u8, buf: &mut [u8]) -> I2CResult<()> {
        self.select_register(register)?;
        let n = self.read(buf)?;
        if n != buf.len() {
            return Err(short_read(buf.len(), n).into());
        }
        Ok(())
    }

    /// Write `values` to consecutive registers starting at `register`
    fn write_reg_bytes(&mut self, register: u8, values: &[u8]) -> I2CResult<()> {
        let mut buf = Vec::with_capacity(values.len() + 1);
        buf.push(register);
        buf.extend_from_slice(values);
        let n = self.write(&buf)?;
        if n != buf.len() {
            return Err(short_write(buf.len(), n).into());
        }
        Ok(())
    }

    fn read_reg_u8(&mut self, register: u8) -> I2CResult<u8> {
        let mut buf = [0; 1];
        self.read_reg_exact(register, &mut buf)?;
        self.wire_log().register_read(register, "u8", buf[0]);
        Ok(buf[0])
    }

    fn write_reg_u8(&mut self, register: u8, value: u8) -> I2CResult<()> {
        self.write_reg_bytes(register, &[value])?;
        self.wire_log().register_write(register, "u8", value);
        Ok(())
    }

    /// Read a word whose first byte on the wire is the high order byte
    fn read_reg_u16_be(&mut self, register: u8) -> I2CResult<u16> {
        let mut buf = [0; 2];
        self.read_reg_exact(register, &mut buf)?;
        let value = BigEndian::read_u16(&buf);
        self.wire_log().register_read(register, "u16", value);
        Ok(value)
    }

    /// Read a word whose first byte on the wire is the low order byte
    fn read_reg_u16_le(&mut self, register: u8) -> I2CResult<u16> {
        Ok(self.read_reg_u16_be(register)?.swap_bytes())
    }

    fn read_reg_s16_be(&mut self, register: u8) -> I2CResult<i16> {
        let mut buf = [0; 2];
        self.read_reg_exact(register, &mut buf)?;
        let value = BigEndian::read_i16(&buf);
        self.wire_log().register_read(register, "s16", value);
        Ok(value)
    }

    fn read_reg_s16_le(&mut self, register: u8) -> I2CResult<i16> {
        Ok(self.read_reg_s16_be(register)?.swap_bytes())
    }

    fn write_reg_u16_be(&mut self, register: u8, value: u16) -> I2CResult<()> {
        let mut buf = [register, 0, 0];
        BigEndian::write_u16(&mut buf[1..], value);
        let n = self.write(&buf)?;
        if n != buf.len() {
            return Err(short_write(buf.len(), n).into());
        }
        self.wire_log().register_write(register, "u16", value);
        Ok(())
    }

    fn write_reg_u16_le(&mut self, register: u8, value: u16) -> I2CResult<()> {
        self.write_reg_u16_be(register, value.swap_bytes())
    }

    fn write_reg_s16_be(&mut self, register: u8, value: i16) -> I2CResult<()> {
        let mut buf = [register, 0, 0];
        BigEndian::write_i16(&mut buf[1..], value);
        let n = self.write(&buf)?;
        if n != buf.len() {
            return Err(short_write(buf.len(), n).into());
        }
        self.wire_log().register_write(register, "s16", value);
        Ok(())
    }

    fn write_reg_s16_le(&mut self, register: u8, value: i16) -> I2CResult<()> {
        self.write_reg_s16_be(register, value.swap_bytes())
    }
}

impl<T: I2CDevice + ?Sized> SMBusRegisters for T {}
