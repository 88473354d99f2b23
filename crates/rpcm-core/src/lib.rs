//! Typed model of the PCM hardware/software parameter structures shared
//! with the kernel driver, and the primitives that narrow them.
//!
//! The driver negotiates a stream configuration over two fixed binary
//! structures: a hardware parameter set holding one capability mask or
//! numeric interval per parameter, and a software parameter set of runtime
//! thresholds. This crate owns those layouts and their local mutation
//! rules; sending them to a driver is the concern of `rpcm-device` and
//! `rpcm-linux`.

mod hw;
mod interval;
pub mod layout;
mod mask;
mod param;
mod sw;

pub use self::hw::{HwParams, NO_PERIOD_WAKEUP};
pub use self::interval::Interval;
pub use self::mask::Mask;
pub use self::param::{Access, Format, Param, Slot};
pub use self::sw::{ClockType, SwParams, TSTAMP_ENABLE};
