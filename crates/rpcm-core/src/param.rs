use crate::layout::{FIRST_INTERVAL, FIRST_MASK, LAST_INTERVAL, LAST_MASK};

/// A negotiable stream parameter.
///
/// The discriminants are the driver's parameter numbers. Mask parameters
/// (discrete capability sets) and interval parameters (numeric ranges)
/// occupy two disjoint number ranges; [`Param::Interrupt`] is a
/// pseudo-parameter stored in the parameter set's flag word rather than in
/// mask or interval storage.
///
/// Several interval parameters are alternate views of the same physical
/// quantity in different units (e.g. [`Param::PeriodTime`] and
/// [`Param::PeriodBytes`] for [`Param::PeriodSize`]). The driver keeps
/// them mutually consistent during refinement; locally each is just an
/// independently addressable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Param {
    /// Access mode capability set, values of [`Access`].
    Access = 0,
    /// Sample encoding capability set, values of [`Format`].
    Format = 1,
    /// Sample subformat capability set.
    Subformat = 2,

    /// Bits per sample. Variant of [`Param::Format`].
    SampleBits = 8,
    /// Bits per frame. Variant of [`Param::Channels`].
    FrameBits = 9,
    /// Channels per frame.
    Channels = 10,
    /// Frames per second.
    Rate = 11,
    /// Period length in microseconds. Variant of [`Param::PeriodSize`].
    PeriodTime = 12,
    /// Period length in frames.
    PeriodSize = 13,
    /// Period length in bytes. Variant of [`Param::PeriodSize`].
    PeriodBytes = 14,
    /// Periods per buffer. Variant of [`Param::BufferSize`].
    Periods = 15,
    /// Buffer length in microseconds. Variant of [`Param::BufferSize`].
    BufferTime = 16,
    /// Buffer length in frames.
    BufferSize = 17,
    /// Buffer length in bytes. Variant of [`Param::BufferSize`].
    BufferBytes = 18,

    /// Period-wakeup suppression. Nonzero disables per-period interrupts.
    Interrupt = 20,
}

/// Storage slot a parameter resolves to inside the hardware parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Index into the mask table.
    Mask(usize),
    /// Index into the interval table.
    Interval(usize),
    /// Not backed by a table slot; lives in the flag word.
    Wakeup,
}

impl Param {
    /// The driver's number for this parameter.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Resolves the parameter to its storage slot. Total by construction:
    /// the slot index is the parameter number offset into its table.
    pub fn slot(self) -> Slot {
        let n = self as u32;
        if (FIRST_MASK..=LAST_MASK).contains(&n) {
            Slot::Mask((n - FIRST_MASK) as usize)
        } else if (FIRST_INTERVAL..=LAST_INTERVAL).contains(&n) {
            Slot::Interval((n - FIRST_INTERVAL) as usize)
        } else {
            Slot::Wakeup
        }
    }
}

/// How the application transfers samples to and from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u32)]
pub enum Access {
    MmapInterleaved = 0,
    MmapNoninterleaved = 1,
    MmapComplex = 2,
    RwInterleaved = 3,
    RwNoninterleaved = 4,
}

impl From<Access> for u32 {
    fn from(access: Access) -> u32 {
        access as u32
    }
}

/// Sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u32)]
pub enum Format {
    S8 = 0,
    U8 = 1,
    S16Le = 2,
    S16Be = 3,
    U16Le = 4,
    U16Be = 5,
    S32Le = 10,
    S32Be = 11,
    U32Le = 12,
    U32Be = 13,
    FloatLe = 14,
}

impl Format {
    /// Width of one sample in bits.
    pub fn width(self) -> u32 {
        match self {
            Format::S8 | Format::U8 => 8,
            Format::S16Le | Format::S16Be | Format::U16Le | Format::U16Be => 16,
            Format::S32Le
            | Format::S32Be
            | Format::U32Le
            | Format::U32Be
            | Format::FloatLe => 32,
        }
    }
}

impl From<Format> for u32 {
    fn from(format: Format) -> u32 {
        format as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_disjoint_and_total() {
        let params = [
            Param::Access,
            Param::Format,
            Param::Subformat,
            Param::SampleBits,
            Param::FrameBits,
            Param::Channels,
            Param::Rate,
            Param::PeriodTime,
            Param::PeriodSize,
            Param::PeriodBytes,
            Param::Periods,
            Param::BufferTime,
            Param::BufferSize,
            Param::BufferBytes,
            Param::Interrupt,
        ];

        let mut masks = Vec::new();
        let mut intervals = Vec::new();
        for param in params {
            match param.slot() {
                Slot::Mask(i) => masks.push(i),
                Slot::Interval(i) => intervals.push(i),
                Slot::Wakeup => assert_eq!(param, Param::Interrupt),
            }
        }

        masks.sort_unstable();
        intervals.sort_unstable();
        assert_eq!(masks, vec![0, 1, 2]);
        assert_eq!(intervals, (0..=10).collect::<Vec<_>>());
    }

    #[test]
    fn interval_slot_is_number_offset() {
        assert_eq!(Param::Rate.slot(), Slot::Interval(3));
        assert_eq!(Param::BufferBytes.slot(), Slot::Interval(10));
    }
}
