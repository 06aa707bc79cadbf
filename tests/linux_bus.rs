// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

// A regular file stands in for /dev/i2c-N; the binder records what the
// ioctl would have been called with.

use i2creg::{
    AddressBinder, BusConfig, I2CDevice, I2CError, I2CErrorKind, LinuxI2CBus, SMBusRegisters,
    I2C_SLAVE, I2C_SLAVE_FORCE,
};
use nix::errno::Errno;
use std::cell::RefCell;
use std::fs;
use std::os::unix::prelude::*;
use std::path::PathBuf;

struct NodeDir {
    dir: PathBuf,
}

impl NodeDir {
    fn new(name: &str) -> NodeDir {
        let dir = std::env::temp_dir().join(format!("i2creg-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        NodeDir { dir }
    }

    fn config(&self) -> BusConfig {
        BusConfig::default()
            .with_dev_prefix(self.dir.join("i2c-"))
            .with_log_level(None)
    }

    fn create_node(&self, bus: u32, contents: &[u8]) -> PathBuf {
        let path = self.config().device_path(bus);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for NodeDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[derive(Default)]
struct RecordingBinder {
    calls: RefCell<Vec<(u16, u16)>>,
    reject_with: Option<Errno>,
}

impl AddressBinder for RecordingBinder {
    fn bind(&self, fd: RawFd, request: u16, address: u16) -> Result<(), Errno> {
        assert!(fd >= 0);
        self.calls.borrow_mut().push((request, address));
        match self.reject_with {
            Some(errno) => Err(errno),
            None => Ok(()),
        }
    }
}

#[test]
fn test_open_binds_address_on_bus_node() {
    let nodes = NodeDir::new("bind");
    let path = nodes.create_node(2, &[]);
    let binder = RecordingBinder::default();

    let mut dev = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x27, 2).unwrap();
    assert_eq!(binder.calls.borrow().as_slice(), &[(I2C_SLAVE, 0x27)]);
    assert_eq!(dev.bus(), 2);
    assert_eq!(dev.address(), 0x27);
    assert!(path.ends_with("i2c-2"));

    dev.write_reg_u8(0x01, 0xF3).unwrap();
    dev.close().unwrap();
    assert_eq!(fs::read(&path).unwrap(), vec![0x01, 0xF3]);
}

#[test]
fn test_open_uses_configured_request_code() {
    let nodes = NodeDir::new("force");
    nodes.create_node(0, &[]);
    let binder = RecordingBinder::default();
    let config = nodes.config().with_bind_request(I2C_SLAVE_FORCE);

    LinuxI2CBus::open_with_binder(&config, &binder, 0x50, 0).unwrap();
    assert_eq!(binder.calls.borrow().as_slice(), &[(I2C_SLAVE_FORCE, 0x50)]);
}

#[test]
fn test_missing_node_is_device_not_found() {
    let nodes = NodeDir::new("missing");
    let binder = RecordingBinder::default();

    let err = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x27, 9).unwrap_err();
    assert_eq!(err.kind(), I2CErrorKind::DeviceNotFound);
    assert!(binder.calls.borrow().is_empty());
}

#[test]
fn test_rejected_bind_is_bind_failed() {
    let nodes = NodeDir::new("reject");
    nodes.create_node(1, &[]);
    let binder = RecordingBinder {
        reject_with: Some(Errno::EBUSY),
        ..RecordingBinder::default()
    };

    match LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x27, 1) {
        Err(i2creg::I2CError::BindFailed { address, source }) => {
            assert_eq!(address, 0x27);
            assert_eq!(source, Errno::EBUSY);
        }
        other => panic!("expected BindFailed, got {:?}", other),
    }
}

#[test]
fn test_ioctl_on_non_i2c_node_is_bind_failed() {
    let nodes = NodeDir::new("ioctl");
    nodes.create_node(3, &[]);

    let err = LinuxI2CBus::open_with(&nodes.config(), 0x27, 3).unwrap_err();
    assert_eq!(err.kind(), I2CErrorKind::BindFailed);
}

#[test]
fn test_wide_address_rejected_before_bind() {
    let nodes = NodeDir::new("wide");
    nodes.create_node(0, &[]);
    let binder = RecordingBinder::default();

    let err = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x80, 0).unwrap_err();
    assert_eq!(err.kind(), I2CErrorKind::BindFailed);
    assert!(binder.calls.borrow().is_empty());
}

#[test]
fn test_raw_read_surfaces_short_count() {
    let nodes = NodeDir::new("short");
    nodes.create_node(4, &[0x01, 0x02]);
    let binder = RecordingBinder::default();

    let mut dev = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x10, 4).unwrap();
    let mut buf = [0; 4];
    assert_eq!(dev.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], &[0x01, 0x02]);
    assert!(dev.read_bytes(4).unwrap().is_empty());
}

#[test]
fn test_closed_handle() {
    let nodes = NodeDir::new("closed");
    nodes.create_node(5, &[]);
    let binder = RecordingBinder::default();

    let mut dev = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x10, 5).unwrap();
    assert!(!dev.is_closed());
    dev.close().unwrap();
    assert!(dev.is_closed());
    assert_eq!(dev.as_raw_fd(), -1);

    assert_eq!(dev.close().unwrap_err().kind(), I2CErrorKind::ClosedHandle);
    assert_eq!(dev.write(&[0x00]).unwrap_err().kind(), I2CErrorKind::ClosedHandle);
    assert_eq!(
        dev.read_reg_u8(0x00).unwrap_err().kind(),
        I2CErrorKind::ClosedHandle
    );
    assert_eq!(
        dev.functionality().unwrap_err().kind(),
        I2CErrorKind::ClosedHandle
    );
}

#[test]
fn test_functionality_on_non_i2c_node_is_io_error() {
    let nodes = NodeDir::new("funcs");
    nodes.create_node(6, &[]);
    let binder = RecordingBinder::default();

    let dev = LinuxI2CBus::open_with_binder(&nodes.config(), &binder, 0x10, 6).unwrap();
    match dev.functionality().unwrap_err() {
        I2CError::Io(e) => assert_eq!(e.raw_os_error(), Some(Errno::ENOTTY as i32)),
        other => panic!("unexpected error {:?}", other),
    }
}
