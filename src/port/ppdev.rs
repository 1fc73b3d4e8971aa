//! Linux `ppdev` backend (std only).
//!
//! Talks to `/dev/parportN` through the user-mode ioctls of the `ppdev`
//! driver. Only the data, status and control registers are exposed; extended
//! registers such as the ECR are not.

#![allow(unsafe_code)]

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::{AsRawFd, IntoRawFd, RawFd};

use super::backend::{Direction, ParportBackend};

/// Default device node of the first parallel port.
pub const DEFAULT_PORT: &str = "/dev/parport0";

// ioctl request numbers from <linux/ppdev.h> (`'p'` magic, asm-generic encoding).
const PPRSTATUS: u32 = 0x8001_7081;
const PPRCONTROL: u32 = 0x8001_7083;
const PPWCONTROL: u32 = 0x4001_7084;
const PPRDATA: u32 = 0x8001_7085;
const PPWDATA: u32 = 0x4001_7086;
const PPCLAIM: u32 = 0x0000_708b;
const PPRELEASE: u32 = 0x0000_708c;
const PPDATADIR: u32 = 0x4004_7090;

/// Parallel port accessed through the Linux `ppdev` driver.
#[derive(Debug, Default)]
pub struct Ppdev {
    file: Option<File>,
}

impl Ppdev {
    /// Create a backend with no device open.
    pub fn new() -> Self {
        Self::default()
    }

    fn fd(&self) -> io::Result<RawFd> {
        self.file
            .as_ref()
            .map(AsRawFd::as_raw_fd)
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))
    }

    fn ioctl_none(&self, request: u32) -> io::Result<()> {
        let fd = self.fd()?;
        // SAFETY: `fd` is an open ppdev descriptor and the request takes no argument.
        let ret = unsafe { libc::ioctl(fd, request as _) };
        check(ret)
    }

    fn ioctl_read(&self, request: u32) -> io::Result<u8> {
        let fd = self.fd()?;
        let mut value: libc::c_uchar = 0;
        // SAFETY: the request writes exactly one byte through the pointer.
        let ret = unsafe { libc::ioctl(fd, request as _, &mut value as *mut libc::c_uchar) };
        check(ret).map(|()| value)
    }

    fn ioctl_write(&self, request: u32, value: u8) -> io::Result<()> {
        let fd = self.fd()?;
        let value: libc::c_uchar = value;
        // SAFETY: the request reads exactly one byte through the pointer.
        let ret = unsafe { libc::ioctl(fd, request as _, &value as *const libc::c_uchar) };
        check(ret)
    }
}

fn check(ret: libc::c_int) -> io::Result<()> {
    if ret < 0 {
        let err = io::Error::last_os_error();
        log::debug!("ppdev ioctl failed: {}", err);
        Err(err)
    } else {
        Ok(())
    }
}

impl ParportBackend for Ppdev {
    type Error = io::Error;

    fn open(&mut self, path: &str) -> Result<(), Self::Error> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        self.file = Some(file);
        Ok(())
    }

    fn claim(&mut self) -> Result<(), Self::Error> {
        self.ioctl_none(PPCLAIM)
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.ioctl_none(PPRELEASE)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        let file = self
            .file
            .take()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))?;
        let fd = file.into_raw_fd();
        // SAFETY: ownership of `fd` was taken from the `File`, so it is closed exactly once.
        let ret = unsafe { libc::close(fd) };
        check(ret)
    }

    fn set_data_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let fd = self.fd()?;
        let reverse: libc::c_int = match direction {
            Direction::Out => 0,
            Direction::In => 1,
        };
        // SAFETY: PPDATADIR reads one `int` through the pointer.
        let ret = unsafe { libc::ioctl(fd, PPDATADIR as _, &reverse as *const libc::c_int) };
        check(ret)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        self.ioctl_read(PPRDATA)
    }

    fn write_data(&mut self, value: u8) -> Result<(), Self::Error> {
        self.ioctl_write(PPWDATA, value)
    }

    fn read_status(&mut self) -> Result<u8, Self::Error> {
        self.ioctl_read(PPRSTATUS)
    }

    fn read_control(&mut self) -> Result<u8, Self::Error> {
        self.ioctl_read(PPRCONTROL)
    }

    fn write_control(&mut self, value: u8) -> Result<(), Self::Error> {
        self.ioctl_write(PPWCONTROL, value)
    }
}
