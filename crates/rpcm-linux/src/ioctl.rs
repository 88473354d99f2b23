//! The PCM ioctl surface. Request numbers and argument layouts are the
//! kernel's contract; the sizes encoded into each request come from the
//! repr(C) types, so those must stay wire-exact.

use rpcm_core::{HwParams, SwParams};

use crate::sync::{RawStatus, SyncPtr};

const MAGIC: u8 = b'A';

/// Interleaved transfer block. The driver writes the transferred frame
/// count into `result`.
#[allow(dead_code)]
#[repr(C)]
pub(crate) struct XferI {
    pub result: libc::c_long,
    pub buf: *mut libc::c_void,
    pub frames: libc::c_ulong,
}

/// Scattered transfer block: one buffer pointer per channel.
#[allow(dead_code)]
#[repr(C)]
pub(crate) struct XferN {
    pub result: libc::c_long,
    pub bufs: *mut *mut libc::c_void,
    pub frames: libc::c_ulong,
}

nix::ioctl_readwrite!(hw_refine, MAGIC, 0x10, HwParams);
nix::ioctl_readwrite!(hw_params, MAGIC, 0x11, HwParams);
nix::ioctl_readwrite!(sw_params, MAGIC, 0x13, SwParams);

nix::ioctl_read!(status, MAGIC, 0x20, RawStatus);
nix::ioctl_readwrite!(sync_ptr, MAGIC, 0x23, SyncPtr);

nix::ioctl_none!(prepare, MAGIC, 0x40);
nix::ioctl_none!(reset, MAGIC, 0x41);
nix::ioctl_none!(start, MAGIC, 0x42);
nix::ioctl_none!(drop, MAGIC, 0x43);
nix::ioctl_none!(drain, MAGIC, 0x44);
nix::ioctl_write_int!(pause, MAGIC, 0x45);
nix::ioctl_write_ptr!(rewind, MAGIC, 0x46, libc::c_ulong);
nix::ioctl_none!(resume, MAGIC, 0x47);
nix::ioctl_none!(xrun, MAGIC, 0x48);
nix::ioctl_write_ptr!(forward, MAGIC, 0x49, libc::c_ulong);

nix::ioctl_write_ptr!(writei, MAGIC, 0x50, XferI);
nix::ioctl_read!(readi, MAGIC, 0x51, XferI);
nix::ioctl_write_ptr!(writen, MAGIC, 0x52, XferN);
nix::ioctl_read!(readn, MAGIC, 0x53, XferN);

nix::ioctl_write_int!(link, MAGIC, 0x60);
nix::ioctl_none!(unlink, MAGIC, 0x61);
