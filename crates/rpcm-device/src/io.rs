use std::time::Duration;

use rpcm_core::{HwParams, SwParams};

use crate::Result;

/// The four driver operations the negotiation protocol is built on. Each
/// is a single blocking round trip with no internal retry; the transport
/// maps a driver refusal to [`Error::Rejected`](crate::Error::Rejected)
/// and any other failure to [`Error::Transport`](crate::Error::Transport).
pub trait PcmIo {
    /// Asks the driver to narrow the parameter set without fixing it. The
    /// driver updates masks, intervals and the changed bitmask in place.
    fn send_refine(&mut self, params: &mut HwParams) -> Result<()>;

    /// Sends the parameter set as the final configuration. On success the
    /// driver has collapsed every mask to one bit and every interval to a
    /// single value, and the device is prepared to run.
    fn send_commit_hw(&mut self, params: &mut HwParams) -> Result<()>;

    /// Sends the derived software parameters. Not negotiated: the driver
    /// either takes them or refuses.
    fn send_commit_sw(&mut self, params: &mut SwParams) -> Result<()>;

    /// Current device state and the timestamp of the last start/stop
    /// action.
    fn query_status(&mut self) -> Result<Status>;
}

/// Device lifecycle state as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceState {
    Open,
    Setup,
    Prepared,
    Running,
    Xrun,
    Draining,
    Paused,
    Suspended,
    Disconnected,
}

impl DeviceState {
    pub fn from_raw(raw: u32) -> Option<DeviceState> {
        Some(match raw {
            0 => DeviceState::Open,
            1 => DeviceState::Setup,
            2 => DeviceState::Prepared,
            3 => DeviceState::Running,
            4 => DeviceState::Xrun,
            5 => DeviceState::Draining,
            6 => DeviceState::Paused,
            7 => DeviceState::Suspended,
            8 => DeviceState::Disconnected,
            _ => return None,
        })
    }
}

/// Snapshot returned by [`PcmIo::query_status`].
#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub state: DeviceState,
    /// Wall-clock time of the last start/stop action.
    pub trigger_time: Duration,
}
