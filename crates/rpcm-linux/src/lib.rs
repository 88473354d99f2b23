//! Linux ALSA transport for the negotiation engine: `/dev/snd` device
//! handles, the PCM ioctl surface, stream actions, position
//! synchronization and frame transfer.

mod device;
mod error;
mod ioctl;
mod sync;

pub use self::device::{Direction, Pcm};
pub use self::error::{Error, Result};
pub use self::sync::PcmSync;
