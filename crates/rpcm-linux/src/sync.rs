//! Position and state synchronization.
//!
//! The kernel exchanges status and control through one ioctl block whose
//! flag word inverts meaning per field (a set flag means "report back",
//! a clear flag means "take mine"). That surface is kept private; the
//! public operations are explicitly named reads and writes.

use rpcm_device::DeviceState;

use crate::device::Pcm;
use crate::ioctl;
use crate::{Error, Result};

/// Request a hardware pointer update before reporting.
const FLAG_HWSYNC: u32 = 1;
/// Report the application pointer back instead of taking ours.
const FLAG_GET_APPL: u32 = 1 << 1;
/// Report the wakeup minimum back instead of taking ours.
const FLAG_GET_AVAIL_MIN: u32 = 1 << 2;

// only state and the pointers are consumed; the remaining fields exist
// for wire layout
#[allow(dead_code)]
#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct MmapStatus {
    pub state: u32,
    pad1: i32,
    pub hw_ptr: libc::c_ulong,
    pub tstamp: libc::timespec,
    pub suspended_state: u32,
    pub audio_tstamp: libc::timespec,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct MmapControl {
    pub appl_ptr: libc::c_ulong,
    pub avail_min: libc::c_ulong,
}

#[allow(dead_code)]
#[derive(Clone, Copy)]
#[repr(C)]
struct StatusBox {
    status: MmapStatus,
    reserved: [u8; 8],
}

#[allow(dead_code)]
#[derive(Clone, Copy)]
#[repr(C)]
struct ControlBox {
    control: MmapControl,
    reserved: [u8; 48],
}

#[repr(C)]
pub(crate) struct SyncPtr {
    flags: u32,
    s: StatusBox,
    c: ControlBox,
}

impl SyncPtr {
    fn zeroed() -> SyncPtr {
        SyncPtr {
            flags: 0,
            s: StatusBox {
                status: MmapStatus {
                    state: 0,
                    pad1: 0,
                    hw_ptr: 0,
                    tstamp: ZERO_TIMESPEC,
                    suspended_state: 0,
                    audio_tstamp: ZERO_TIMESPEC,
                },
                reserved: [0; 8],
            },
            c: ControlBox {
                control: MmapControl {
                    appl_ptr: 0,
                    avail_min: 0,
                },
                reserved: [0; 48],
            },
        }
    }
}

/// Full status block returned by the status ioctl. Only the fields the
/// crate consumes are decoded; the rest ride along for layout fidelity.
#[allow(dead_code)]
#[repr(C)]
pub(crate) struct RawStatus {
    pub state: u32,
    pub trigger_tstamp: libc::timespec,
    pub tstamp: libc::timespec,
    pub appl_ptr: libc::c_ulong,
    pub hw_ptr: libc::c_ulong,
    pub delay: libc::c_long,
    pub avail: libc::c_ulong,
    pub avail_max: libc::c_ulong,
    pub overrange: libc::c_ulong,
    pub suspended_state: u32,
    pub audio_tstamp_data: u32,
    pub audio_tstamp: libc::timespec,
    pub driver_tstamp: libc::timespec,
    pub audio_tstamp_accuracy: u32,
    reserved: [u8; 20],
}

const ZERO_TIMESPEC: libc::timespec = libc::timespec {
    tv_sec: 0,
    tv_nsec: 0,
};

impl RawStatus {
    pub(crate) fn zeroed() -> RawStatus {
        RawStatus {
            state: 0,
            trigger_tstamp: ZERO_TIMESPEC,
            tstamp: ZERO_TIMESPEC,
            appl_ptr: 0,
            hw_ptr: 0,
            delay: 0,
            avail: 0,
            avail_max: 0,
            overrange: 0,
            suspended_state: 0,
            audio_tstamp_data: 0,
            audio_tstamp: ZERO_TIMESPEC,
            driver_tstamp: ZERO_TIMESPEC,
            audio_tstamp_accuracy: 0,
            reserved: [0; 20],
        }
    }
}

/// Decoded position snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PcmSync {
    pub state: DeviceState,
    /// Frames the hardware has consumed or produced.
    pub hw_ptr: u64,
    /// Frames the application has written or read.
    pub appl_ptr: u64,
    /// Frames that must be available before a wakeup.
    pub avail_min: u64,
}

impl Pcm {
    /// Reads the current status and control without disturbing either
    /// side's pointers.
    pub fn sync(&mut self) -> Result<PcmSync> {
        self.sync_flags(FLAG_GET_APPL | FLAG_GET_AVAIL_MIN)
    }

    /// Like [`Pcm::sync`], but asks the driver to refresh the hardware
    /// pointer from the hardware first.
    pub fn sync_hw_update(&mut self) -> Result<PcmSync> {
        self.sync_flags(FLAG_HWSYNC | FLAG_GET_APPL | FLAG_GET_AVAIL_MIN)
    }

    /// Moves the application pointer to an absolute frame position.
    pub fn commit_appl_ptr(&mut self, appl_ptr: u64) -> Result<()> {
        let mut block = SyncPtr::zeroed();
        block.flags = FLAG_GET_AVAIL_MIN;
        block.c.control.appl_ptr = appl_ptr as libc::c_ulong;
        unsafe { ioctl::sync_ptr(self.raw(), &mut block)? };
        Ok(())
    }

    /// Sets the wakeup minimum.
    pub fn commit_avail_min(&mut self, avail_min: u64) -> Result<()> {
        let mut block = SyncPtr::zeroed();
        block.flags = FLAG_GET_APPL;
        block.c.control.avail_min = avail_min as libc::c_ulong;
        unsafe { ioctl::sync_ptr(self.raw(), &mut block)? };
        Ok(())
    }

    fn sync_flags(&mut self, flags: u32) -> Result<PcmSync> {
        let mut block = SyncPtr::zeroed();
        block.flags = flags;
        unsafe { ioctl::sync_ptr(self.raw(), &mut block)? };

        let state = DeviceState::from_raw(block.s.status.state)
            .ok_or(Error::UnknownState(block.s.status.state))?;
        Ok(PcmSync {
            state,
            hw_ptr: block.s.status.hw_ptr as u64,
            appl_ptr: block.c.control.appl_ptr as u64,
            avail_min: block.c.control.avail_min as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn sync_block_matches_the_contract() {
        assert_eq!(size_of::<MmapStatus>(), 56);
        assert_eq!(size_of::<MmapControl>(), 16);
        assert_eq!(size_of::<SyncPtr>(), 136);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn status_block_matches_the_contract() {
        assert_eq!(size_of::<RawStatus>(), 152);
    }
}
