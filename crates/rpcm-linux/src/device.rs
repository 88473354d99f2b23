use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use rpcm_core::{HwParams, SwParams};
use rpcm_device::{DeviceState, PcmIo, Status};

use crate::ioctl::{self, XferI, XferN};
use crate::sync::RawStatus;
use crate::{Error, Result};

/// Transfer direction of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Playback,
    Capture,
}

impl Direction {
    fn suffix(self) -> char {
        match self {
            Direction::Playback => 'p',
            Direction::Capture => 'c',
        }
    }
}

fn device_path(card: u32, device: u32, dir: Direction) -> String {
    format!("/dev/snd/pcmC{card}D{device}{}", dir.suffix())
}

/// An open PCM device. Implements [`PcmIo`], so a negotiation from
/// `rpcm-device` can be driven against it directly.
///
/// The descriptor is closed on drop.
#[derive(Debug)]
pub struct Pcm {
    fd: OwnedFd,
}

impl Pcm {
    pub fn open(card: u32, device: u32, dir: Direction) -> Result<Pcm> {
        Pcm::open_with(card, device, dir, OFlag::empty())
    }

    /// Opens without blocking on a busy device; frame transfer on the
    /// returned handle is nonblocking too.
    pub fn open_nonblocking(card: u32, device: u32, dir: Direction) -> Result<Pcm> {
        Pcm::open_with(card, device, dir, OFlag::O_NONBLOCK)
    }

    fn open_with(card: u32, device: u32, dir: Direction, extra: OFlag) -> Result<Pcm> {
        let path = device_path(card, device, dir);
        let fd = open(path.as_str(), OFlag::O_RDWR | extra, Mode::empty())
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(%path, "opened pcm device");
        Ok(Pcm {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
        })
    }

    pub(crate) fn raw(&self) -> RawFd {
        self.fd.as_raw_fd()
    }

    pub fn prepare(&mut self) -> Result<()> {
        unsafe { ioctl::prepare(self.raw())? };
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        unsafe { ioctl::start(self.raw())? };
        Ok(())
    }

    /// Stops immediately, dropping queued frames.
    pub fn stop(&mut self) -> Result<()> {
        unsafe { ioctl::drop(self.raw())? };
        Ok(())
    }

    /// Stops after queued frames have played out.
    pub fn drain(&mut self) -> Result<()> {
        unsafe { ioctl::drain(self.raw())? };
        Ok(())
    }

    pub fn pause(&mut self, pause: bool) -> Result<()> {
        unsafe { ioctl::pause(self.raw(), pause as libc::c_ulong)? };
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        unsafe { ioctl::reset(self.raw())? };
        Ok(())
    }

    /// Only has an effect when power management suspended the device.
    pub fn resume(&mut self) -> Result<()> {
        unsafe { ioctl::resume(self.raw())? };
        Ok(())
    }

    /// Stops like [`Pcm::stop`] but marks the stream as underrun.
    pub fn xrun(&mut self) -> Result<()> {
        unsafe { ioctl::xrun(self.raw())? };
        Ok(())
    }

    /// Moves the application pointer by `delta` frames, rewinding when
    /// negative. Returns the frames actually moved.
    pub fn move_appl_ptr(&mut self, delta: i64) -> Result<u64> {
        let mut frames = delta.unsigned_abs() as libc::c_ulong;
        let ptr = &mut frames as *mut libc::c_ulong as *const libc::c_ulong;
        if delta < 0 {
            unsafe { ioctl::rewind(self.raw(), ptr)? };
        } else {
            unsafe { ioctl::forward(self.raw(), ptr)? };
        }
        Ok(frames as u64)
    }

    /// Couples this stream to `other` for synchronized start and stop.
    /// Both streams must already be configured; an opaque pass-through.
    pub fn link(&mut self, other: &Pcm) -> Result<()> {
        unsafe { ioctl::link(self.raw(), other.raw() as libc::c_ulong)? };
        Ok(())
    }

    pub fn unlink(&mut self) -> Result<()> {
        unsafe { ioctl::unlink(self.raw())? };
        Ok(())
    }

    /// Writes `frames` interleaved frames from `buf`. The caller sizes
    /// `buf` to the negotiated frame width. Returns the frames accepted,
    /// which may be fewer on a nonblocking handle.
    pub fn writei(&mut self, buf: &[u8], frames: u64) -> Result<u64> {
        let mut xfer = XferI {
            result: 0,
            buf: buf.as_ptr() as *mut libc::c_void,
            frames: frames as libc::c_ulong,
        };
        unsafe { ioctl::writei(self.raw(), &mut xfer as *mut XferI as *const XferI)? };
        Ok(xfer.result as u64)
    }

    /// Reads up to `frames` interleaved frames into `buf`.
    pub fn readi(&mut self, buf: &mut [u8], frames: u64) -> Result<u64> {
        let mut xfer = XferI {
            result: 0,
            buf: buf.as_mut_ptr() as *mut libc::c_void,
            frames: frames as libc::c_ulong,
        };
        unsafe { ioctl::readi(self.raw(), &mut xfer)? };
        Ok(xfer.result as u64)
    }

    /// Writes `frames` frames scattered over one buffer per channel.
    pub fn writen(&mut self, channels: &[&[u8]], frames: u64) -> Result<u64> {
        let mut bufs: Vec<*mut libc::c_void> = channels
            .iter()
            .map(|buf| buf.as_ptr() as *mut libc::c_void)
            .collect();
        let mut xfer = XferN {
            result: 0,
            bufs: bufs.as_mut_ptr(),
            frames: frames as libc::c_ulong,
        };
        unsafe { ioctl::writen(self.raw(), &mut xfer as *mut XferN as *const XferN)? };
        Ok(xfer.result as u64)
    }

    /// Reads up to `frames` frames scattered over one buffer per channel.
    pub fn readn(&mut self, channels: &mut [&mut [u8]], frames: u64) -> Result<u64> {
        let mut bufs: Vec<*mut libc::c_void> = channels
            .iter_mut()
            .map(|buf| buf.as_mut_ptr() as *mut libc::c_void)
            .collect();
        let mut xfer = XferN {
            result: 0,
            bufs: bufs.as_mut_ptr(),
            frames: frames as libc::c_ulong,
        };
        unsafe { ioctl::readn(self.raw(), &mut xfer)? };
        Ok(xfer.result as u64)
    }
}

impl AsRawFd for Pcm {
    fn as_raw_fd(&self) -> RawFd {
        self.raw()
    }
}

impl PcmIo for Pcm {
    fn send_refine(&mut self, params: &mut HwParams) -> rpcm_device::Result<()> {
        unsafe { ioctl::hw_refine(self.raw(), params) }
            .map(|_| ())
            .map_err(reject_on_inval)
    }

    fn send_commit_hw(&mut self, params: &mut HwParams) -> rpcm_device::Result<()> {
        unsafe { ioctl::hw_params(self.raw(), params) }.map_err(reject_on_inval)?;
        unsafe { ioctl::prepare(self.raw()) }
            .map(|_| ())
            .map_err(transport)
    }

    fn send_commit_sw(&mut self, params: &mut SwParams) -> rpcm_device::Result<()> {
        unsafe { ioctl::sw_params(self.raw(), params) }
            .map(|_| ())
            .map_err(reject_on_inval)
    }

    fn query_status(&mut self) -> rpcm_device::Result<Status> {
        let mut raw = RawStatus::zeroed();
        unsafe { ioctl::status(self.raw(), &mut raw) }.map_err(transport)?;

        let state = DeviceState::from_raw(raw.state).ok_or_else(|| {
            rpcm_device::Error::Transport(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown device state {}", raw.state),
            ))
        })?;
        let trigger_time = Duration::new(
            raw.trigger_tstamp.tv_sec.max(0) as u64,
            raw.trigger_tstamp.tv_nsec as u32,
        );
        Ok(Status {
            state,
            trigger_time,
        })
    }
}

/// The driver answers an infeasible constraint set with `EINVAL`; that is
/// a negotiation verdict, not a transport failure.
fn reject_on_inval(errno: Errno) -> rpcm_device::Error {
    match errno {
        Errno::EINVAL => rpcm_device::Error::Rejected,
        errno => transport(errno),
    }
}

fn transport(errno: Errno) -> rpcm_device::Error {
    rpcm_device::Error::Transport(errno.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_paths_follow_the_kernel_naming() {
        assert_eq!(
            device_path(0, 0, Direction::Playback),
            "/dev/snd/pcmC0D0p"
        );
        assert_eq!(device_path(2, 7, Direction::Capture), "/dev/snd/pcmC2D7c");
    }

    #[test]
    fn missing_device_reports_the_path() {
        let error = Pcm::open(99, 99, Direction::Playback).unwrap_err();
        match error {
            Error::Open { path, .. } => assert_eq!(path, "/dev/snd/pcmC99D99p"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
