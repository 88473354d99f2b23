//! Slot counts and parameter numbering of the driver's binary contract.
//!
//! These constants are dictated by the kernel interface and are
//! load-bearing: the parameter set is exchanged with the driver as raw
//! bytes, so every count here translates directly into a field offset.

/// Parameter number of the first mask parameter.
pub const FIRST_MASK: u32 = 0;
/// Parameter number of the last mask parameter.
pub const LAST_MASK: u32 = 2;

/// Parameter number of the first interval parameter.
pub const FIRST_INTERVAL: u32 = 8;
/// Parameter number of the last interval parameter (a deprecated slot not
/// exposed through [`Param`](crate::Param), but present in the layout).
pub const LAST_INTERVAL: u32 = 19;

/// Mask slots carried in the hardware parameter set.
pub const MASK_COUNT: usize = (LAST_MASK - FIRST_MASK + 1) as usize;
/// Interval slots carried in the hardware parameter set.
pub const INTERVAL_COUNT: usize = (LAST_INTERVAL - FIRST_INTERVAL + 1) as usize;

/// 32-bit words per mask; 256 addressable values covers the richest
/// enumerated parameter.
pub const MASK_WORDS: usize = 8;

/// Mask slots reserved for future parameters, zeroed on the wire.
pub const RESERVED_MASKS: usize = 5;
/// Interval slots reserved for future parameters, zeroed on the wire.
pub const RESERVED_INTERVALS: usize = 9;
