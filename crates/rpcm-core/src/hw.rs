use crate::interval::Interval;
use crate::layout::{INTERVAL_COUNT, MASK_COUNT, RESERVED_INTERVALS, RESERVED_MASKS};
use crate::mask::Mask;
use crate::param::{Param, Slot};

/// Flag bit suppressing per-period wakeup interrupts.
pub const NO_PERIOD_WAKEUP: u32 = 1 << 2;

/// The hardware parameter set exchanged with the driver.
///
/// This is the wire structure itself: field order and sizes match the
/// driver's binary contract exactly and must not be rearranged. One mask
/// or interval slot exists per parameter; `rmask` selects which slots the
/// next refine request lets the driver narrow, `cmask` reports which slots
/// the driver changed in its last response, and `info` carries opaque
/// driver capability bits.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct HwParams {
    flags: u32,
    masks: [Mask; MASK_COUNT],
    // reserved wire space, zeroed and never interpreted
    #[allow(dead_code)]
    reserved_masks: [Mask; RESERVED_MASKS],
    intervals: [Interval; INTERVAL_COUNT],
    #[allow(dead_code)]
    reserved_intervals: [Interval; RESERVED_INTERVALS],
    rmask: u32,
    cmask: u32,
    info: u32,
    msbits: u32,
    rate_num: u32,
    rate_den: u32,
    fifo_size: libc::c_ulong,
    #[allow(dead_code)]
    reserved: [u8; 64],
}

impl HwParams {
    /// An all-zero set. Unusable until [`HwParams::fill`] establishes the
    /// "nothing yet excluded" entry state.
    pub const fn new() -> HwParams {
        HwParams {
            flags: 0,
            masks: [Mask::empty(); MASK_COUNT],
            reserved_masks: [Mask::empty(); RESERVED_MASKS],
            intervals: [Interval::new(); INTERVAL_COUNT],
            reserved_intervals: [Interval::new(); RESERVED_INTERVALS],
            rmask: 0,
            cmask: 0,
            info: 0,
            msbits: 0,
            rate_num: 0,
            rate_den: 0,
            fifo_size: 0,
            reserved: [0; 64],
        }
    }

    /// Resets the set so that every parameter allows every value: all
    /// masks all-ones, all intervals `[0, MAX]` closed and integer-only,
    /// every parameter requested for refinement. The driver strips values
    /// that the hardware cannot do or that contradict other parameters;
    /// if nothing remains it rejects the whole set.
    pub fn fill(&mut self) {
        *self = HwParams::new();

        for mask in &mut self.masks {
            mask.fill();
        }
        for interval in &mut self.intervals {
            interval.fill();
        }

        self.rmask = u32::MAX;
        self.cmask = 0;
        self.info = u32::MAX;
    }

    /// Narrows `param` to `value`: collapse-then-accumulate for masks,
    /// single-value overwrite for intervals, flag toggle for
    /// [`Param::Interrupt`].
    pub fn set(&mut self, param: Param, value: u32) {
        match param.slot() {
            Slot::Mask(i) => self.masks[i].set(value),
            Slot::Interval(i) => self.intervals[i].set(value),
            Slot::Wakeup => {
                if value != 0 {
                    self.flags |= NO_PERIOD_WAKEUP;
                } else {
                    self.flags &= !NO_PERIOD_WAKEUP;
                }
            }
        }
    }

    /// Narrows an interval parameter to `[min, max]`. A range request on
    /// anything that is not an interval degrades to a scalar
    /// [`HwParams::set`] of `min`.
    pub fn set_range(&mut self, param: Param, min: u32, max: u32) {
        match param.slot() {
            Slot::Interval(i) => self.intervals[i].set_range(min, max),
            Slot::Mask(_) | Slot::Wakeup => self.set(param, min),
        }
    }

    /// Reads `param`: for masks, whether `value` is allowed (0 or 1); for
    /// intervals, the effective minimum (`value` is ignored); for
    /// [`Param::Interrupt`], whether wakeups are suppressed.
    pub fn get(&self, param: Param, value: u32) -> u32 {
        match param.slot() {
            Slot::Mask(i) => self.masks[i].test(value) as u32,
            Slot::Interval(i) => self.intervals[i].value(),
            Slot::Wakeup => (self.flags & NO_PERIOD_WAKEUP != 0) as u32,
        }
    }

    /// Effective closed bounds of an interval parameter. Anything that is
    /// not an interval degrades to the scalar path.
    pub fn get_range(&self, param: Param) -> (u32, u32) {
        match param.slot() {
            Slot::Interval(i) => self.intervals[i].bounds(),
            Slot::Mask(_) | Slot::Wakeup => {
                let value = self.get(param, 0);
                (value, value)
            }
        }
    }

    pub fn mask(&self, param: Param) -> Option<&Mask> {
        match param.slot() {
            Slot::Mask(i) => Some(&self.masks[i]),
            _ => None,
        }
    }

    pub fn interval(&self, param: Param) -> Option<&Interval> {
        match param.slot() {
            Slot::Interval(i) => Some(&self.intervals[i]),
            _ => None,
        }
    }

    /// Driver-side access to a mask slot; responses are written here.
    pub fn mask_mut(&mut self, param: Param) -> Option<&mut Mask> {
        match param.slot() {
            Slot::Mask(i) => Some(&mut self.masks[i]),
            _ => None,
        }
    }

    /// Driver-side access to an interval slot.
    pub fn interval_mut(&mut self, param: Param) -> Option<&mut Interval> {
        match param.slot() {
            Slot::Interval(i) => Some(&mut self.intervals[i]),
            _ => None,
        }
    }

    /// Every mask slot, in wire order. Driver-side.
    pub fn masks_mut(&mut self) -> impl Iterator<Item = &mut Mask> {
        self.masks.iter_mut()
    }

    /// Every interval slot, in wire order. Driver-side.
    pub fn intervals_mut(&mut self) -> impl Iterator<Item = &mut Interval> {
        self.intervals.iter_mut()
    }

    /// Bitmask of parameters the driver changed in its last response.
    pub fn changed(&self) -> u32 {
        self.cmask
    }

    /// Marks the driver's response as having changed `param`. Driver-side.
    pub fn mark_changed(&mut self, param: Param) {
        self.cmask |= 1 << param.number();
    }

    /// Opaque driver capability bits from the last response.
    pub fn info(&self) -> u32 {
        self.info
    }

    /// Application-controlled behavior flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Significant bits per sample as reported by the driver after a
    /// commit; zero before that.
    pub fn msbits(&self) -> u32 {
        self.msbits
    }

    /// Exact rate as a numerator/denominator pair, driver-reported.
    pub fn rate_ratio(&self) -> (u32, u32) {
        (self.rate_num, self.rate_den)
    }

    /// Hardware FIFO size in frames, driver-reported.
    pub fn fifo_size(&self) -> u64 {
        self.fifo_size as u64
    }
}

impl Default for HwParams {
    fn default() -> HwParams {
        HwParams::new()
    }
}
