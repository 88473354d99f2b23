//! The driver seam and the negotiation protocol.
//!
//! [`PcmIo`] is the four-operation surface a transport must provide;
//! [`Negotiation`] drives a freshly filled parameter space down to the
//! single configuration the driver accepts, then derives and commits the
//! software parameters.

mod error;
mod io;
mod nego;

pub use self::error::{Error, Result};
pub use self::io::{DeviceState, PcmIo, Status};
pub use self::nego::{Negotiation, NegotiationState};
