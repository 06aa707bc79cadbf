// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

//! Loopback transport for testing register level code without hardware

use crate::core::{I2CDevice, I2CResult};
use crate::logging::WireLog;
use std::io;

const REGISTER_COUNT: usize = 0x100;

/// A 256 byte register file with an auto-incrementing offset
pub struct I2CRegisterMap {
    registers: [u8; REGISTER_COUNT],
    offset: usize,
}

impl Default for I2CRegisterMap {
    fn default() -> I2CRegisterMap {
        I2CRegisterMap::new()
    }
}

impl I2CRegisterMap {
    pub fn new() -> I2CRegisterMap {
        I2CRegisterMap {
            registers: [0x00; REGISTER_COUNT],
            offset: 0,
        }
    }

    /// Store `data` starting at `offset`, wrapping after 0xFF
    pub fn write_regs(&mut self, offset: usize, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.registers[(offset + i) % REGISTER_COUNT] = *byte;
        }
    }

    /// View `len` registers starting at `offset` (no wrapping)
    pub fn registers(&self, offset: usize, len: usize) -> &[u8] {
        &self.registers[offset..offset + len]
    }

    /// Current offset the next read will stream from
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn read(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte = self.registers[self.offset];
            self.offset = (self.offset + 1) % REGISTER_COUNT;
        }
    }

    // first byte selects the offset, the rest is register data
    fn write(&mut self, data: &[u8]) {
        if let Some((&offset, values)) = data.split_first() {
            let offset = offset as usize;
            self.write_regs(offset, values);
            self.offset = (offset + values.len()) % REGISTER_COUNT;
        }
    }
}

/// A transfer observed by `MockI2CDevice`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Bytes written
    Write(Vec<u8>),
    /// Number of bytes delivered by a read
    Read(usize),
}

/// In-memory i2c peripheral
///
/// Writes and reads behave like a typical register based device: the
/// first written byte selects a register and subsequent bytes are stored
/// in consecutive registers; reads stream from the selected register.
/// Faults can be injected for the next write or read.
#[derive(Default)]
pub struct MockI2CDevice {
    pub regmap: I2CRegisterMap,
    log: WireLog,
    transfers: Vec<Transfer>,
    reads: usize,
    write_fault: Option<io::ErrorKind>,
    read_fault: Option<io::ErrorKind>,
    read_limit: Option<usize>,
}

impl MockI2CDevice {
    /// Message carried by injected faults
    pub const FAILURE_MESSAGE: &'static str = "injected mock failure";

    pub fn new() -> MockI2CDevice {
        MockI2CDevice::default()
    }

    /// Use `log` for this device's traffic
    pub fn with_wire_log(mut self, log: WireLog) -> MockI2CDevice {
        self.log = log;
        self
    }

    /// Successful transfers, oldest first
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn clear_transfers(&mut self) {
        self.transfers.clear();
    }

    /// Number of read attempts, including failed ones
    pub fn read_count(&self) -> usize {
        self.reads
    }

    pub fn fail_next_write(&mut self, kind: io::ErrorKind) {
        self.write_fault = Some(kind);
    }

    pub fn fail_next_read(&mut self, kind: io::ErrorKind) {
        self.read_fault = Some(kind);
    }

    /// Deliver at most `count` bytes on the next read
    pub fn limit_next_read(&mut self, count: usize) {
        self.read_limit = Some(count);
    }
}

impl I2CDevice for MockI2CDevice {
    fn read(&mut self, data: &mut [u8]) -> I2CResult<usize> {
        self.reads += 1;
        if let Some(kind) = self.read_fault.take() {
            return Err(io::Error::new(kind, MockI2CDevice::FAILURE_MESSAGE).into());
        }
        let n = match self.read_limit.take() {
            Some(limit) if limit < data.len() => limit,
            _ => data.len(),
        };
        self.regmap.read(&mut data[..n]);
        self.log.read(&data[..n]);
        self.transfers.push(Transfer::Read(n));
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> I2CResult<usize> {
        if let Some(kind) = self.write_fault.take() {
            return Err(io::Error::new(kind, MockI2CDevice::FAILURE_MESSAGE).into());
        }
        self.log.write(data);
        self.regmap.write(data);
        self.transfers.push(Transfer::Write(data.to_vec()));
        Ok(data.len())
    }

    fn wire_log(&self) -> &WireLog {
        &self.log
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_regmap_write_selects_offset() {
        let mut map = I2CRegisterMap::new();
        map.write(&[0x10, 0xAA, 0xBB]);
        assert_eq!(map.registers(0x10, 2), &[0xAA, 0xBB]);
        assert_eq!(map.offset(), 0x12);

        map.write(&[0x10]);
        let mut buf = [0; 2];
        map.read(&mut buf);
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_regmap_wraps() {
        let mut map = I2CRegisterMap::new();
        map.write(&[0xFF, 0x01, 0x02]);
        assert_eq!(map.registers(0xFF, 1), &[0x01]);
        assert_eq!(map.registers(0x00, 1), &[0x02]);

        map.write(&[0xFF]);
        let mut buf = [0; 2];
        map.read(&mut buf);
        assert_eq!(buf, [0x01, 0x02]);
    }

    #[test]
    fn test_empty_write_is_noop() {
        let mut dev = MockI2CDevice::new();
        assert_eq!(dev.write(&[]).unwrap(), 0);
        assert_eq!(dev.regmap.offset(), 0);
    }

    #[test]
    fn test_faults_apply_once() {
        let mut dev = MockI2CDevice::new();
        dev.fail_next_write(io::ErrorKind::Other);
        assert!(dev.write(&[0x00, 0x01]).is_err());
        assert_eq!(dev.write(&[0x00, 0x01]).unwrap(), 2);

        dev.fail_next_read(io::ErrorKind::Other);
        let mut buf = [0; 1];
        assert!(dev.read(&mut buf).is_err());
        assert_eq!(dev.read(&mut buf).unwrap(), 1);
        assert_eq!(dev.read_count(), 2);
    }

    #[test]
    fn test_short_read() {
        let mut dev = MockI2CDevice::new();
        dev.limit_next_read(1);
        assert_eq!(dev.read_bytes(4).unwrap().len(), 1);
        assert_eq!(dev.read_bytes(4).unwrap().len(), 4);
    }
}
