use crate::hw::HwParams;
use crate::param::Param;

/// Timestamping enabled, in the wire encoding of `tstamp_mode`.
pub const TSTAMP_ENABLE: i32 = 1;

/// Clock used for stream timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockType {
    Realtime = 0,
    Monotonic = 1,
    MonotonicRaw = 2,
}

/// The software parameter set sent to the driver after the hardware
/// parameters have been committed.
///
/// Wire structure; field order and sizes are the driver's binary
/// contract. Unlike the hardware set there is no refinement phase: the
/// thresholds are derived locally and sent in one round trip.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct SwParams {
    tstamp_mode: libc::c_int,
    // deprecated and driver-managed wire fields; carried for layout only
    #[allow(dead_code)]
    period_step: u32,
    #[allow(dead_code)]
    sleep_min: u32,
    avail_min: libc::c_ulong,
    #[allow(dead_code)]
    xfer_align: libc::c_ulong,
    start_threshold: libc::c_ulong,
    stop_threshold: libc::c_ulong,
    silence_threshold: libc::c_ulong,
    silence_size: libc::c_ulong,
    #[allow(dead_code)]
    boundary: libc::c_ulong,
    #[allow(dead_code)]
    proto: u32,
    tstamp_type: u32,
    #[allow(dead_code)]
    reserved: [u8; 56],
}

impl SwParams {
    /// A set with timestamping enabled on the realtime clock, a start
    /// threshold of one frame, and every other threshold unset. Unset
    /// thresholds are defaulted from the committed hardware parameters by
    /// [`SwParams::apply_defaults`].
    pub const fn new() -> SwParams {
        SwParams {
            tstamp_mode: TSTAMP_ENABLE,
            period_step: 1,
            sleep_min: 0,
            avail_min: 0,
            xfer_align: 0,
            start_threshold: 1,
            stop_threshold: 0,
            silence_threshold: 0,
            silence_size: 0,
            // set by the driver during the software commit
            boundary: 0,
            proto: 0,
            tstamp_type: ClockType::Realtime as u32,
            reserved: [0; 56],
        }
    }

    /// Fills thresholds the application left unset: `avail_min` defaults
    /// to the committed period size and `stop_threshold` to the committed
    /// buffer size. Explicit values survive untouched.
    pub fn apply_defaults(&mut self, hw: &HwParams) {
        if self.avail_min == 0 {
            self.avail_min = hw.get(Param::PeriodSize, 0) as libc::c_ulong;
        }
        if self.stop_threshold == 0 {
            self.stop_threshold = hw.get(Param::BufferSize, 0) as libc::c_ulong;
        }
    }

    pub fn set_clock(&mut self, clock: ClockType) {
        self.tstamp_mode = TSTAMP_ENABLE;
        self.tstamp_type = clock as u32;
    }

    /// Frames that must be available before a wakeup is delivered.
    pub fn set_avail_min(&mut self, frames: u64) {
        self.avail_min = frames as libc::c_ulong;
    }

    /// Queued frames at which the stream starts on its own.
    pub fn set_start_threshold(&mut self, frames: u64) {
        self.start_threshold = frames as libc::c_ulong;
    }

    /// Available frames at which the stream stops (underrun bound).
    pub fn set_stop_threshold(&mut self, frames: u64) {
        self.stop_threshold = frames as libc::c_ulong;
    }

    pub fn set_silence_threshold(&mut self, frames: u64) {
        self.silence_threshold = frames as libc::c_ulong;
    }

    pub fn set_silence_size(&mut self, frames: u64) {
        self.silence_size = frames as libc::c_ulong;
    }

    pub fn avail_min(&self) -> u64 {
        self.avail_min as u64
    }

    pub fn start_threshold(&self) -> u64 {
        self.start_threshold as u64
    }

    pub fn stop_threshold(&self) -> u64 {
        self.stop_threshold as u64
    }

    pub fn silence_threshold(&self) -> u64 {
        self.silence_threshold as u64
    }

    pub fn silence_size(&self) -> u64 {
        self.silence_size as u64
    }

    pub fn clock(&self) -> Option<ClockType> {
        if self.tstamp_mode != TSTAMP_ENABLE {
            return None;
        }
        match self.tstamp_type {
            0 => Some(ClockType::Realtime),
            1 => Some(ClockType::Monotonic),
            2 => Some(ClockType::MonotonicRaw),
            _ => None,
        }
    }
}

impl Default for SwParams {
    fn default() -> SwParams {
        SwParams::new()
    }
}
