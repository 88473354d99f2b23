use std::time::Duration;

use rpcm_core::{Access, Format, HwParams, Mask, Param, SwParams};
use rpcm_device::{DeviceState, Error, Negotiation, NegotiationState, PcmIo, Result, Status};

const RATE_MIN: u32 = 8000;
const RATE_MAX: u32 = 192_000;

/// A well-behaved driver: refine clamps the rate to the hardware window,
/// commit fixes every mask to its lowest allowed bit and every interval
/// to a preferred value inside the requested bounds.
struct EchoDriver;

fn preferred(param: Param) -> Option<u32> {
    Some(match param {
        Param::Channels => 2,
        Param::Rate => 48000,
        Param::PeriodSize => 512,
        Param::Periods => 4,
        Param::BufferSize => 2048,
        Param::SampleBits => 16,
        _ => return None,
    })
}

const INTERVAL_PARAMS: [Param; 11] = [
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
];

impl PcmIo for EchoDriver {
    fn send_refine(&mut self, params: &mut HwParams) -> Result<()> {
        let interval = params.interval_mut(Param::Rate).unwrap();
        let (lo, hi) = interval.bounds();
        if hi < RATE_MIN || lo > RATE_MAX {
            return Err(Error::Rejected);
        }
        if lo < RATE_MIN || hi > RATE_MAX {
            interval.set_range(lo.max(RATE_MIN), hi.min(RATE_MAX));
            params.mark_changed(Param::Rate);
        }
        Ok(())
    }

    fn send_commit_hw(&mut self, params: &mut HwParams) -> Result<()> {
        self.send_refine(params)?;

        for mask in params.masks_mut() {
            let value = mask.first().ok_or(Error::Rejected)?;
            let mut single = Mask::empty();
            single.set(value);
            *mask = single;
        }

        for param in INTERVAL_PARAMS {
            let interval = params.interval_mut(param).unwrap();
            let (lo, hi) = interval.bounds();
            if lo > hi {
                return Err(Error::Rejected);
            }
            let value = preferred(param).unwrap_or(lo).clamp(lo, hi);
            interval.set(value);
        }

        for interval in params.intervals_mut() {
            let (lo, _) = interval.bounds();
            interval.set(lo);
        }

        Ok(())
    }

    fn send_commit_sw(&mut self, _params: &mut SwParams) -> Result<()> {
        Ok(())
    }

    fn query_status(&mut self) -> Result<Status> {
        Ok(Status {
            state: DeviceState::Prepared,
            trigger_time: Duration::ZERO,
        })
    }
}

/// A driver that refuses every configuration.
struct RejectingDriver;

impl PcmIo for RejectingDriver {
    fn send_refine(&mut self, _params: &mut HwParams) -> Result<()> {
        Err(Error::Rejected)
    }

    fn send_commit_hw(&mut self, _params: &mut HwParams) -> Result<()> {
        Err(Error::Rejected)
    }

    fn send_commit_sw(&mut self, _params: &mut SwParams) -> Result<()> {
        Err(Error::Rejected)
    }

    fn query_status(&mut self) -> Result<Status> {
        Ok(Status {
            state: DeviceState::Setup,
            trigger_time: Duration::ZERO,
        })
    }
}

/// A driver whose transport fails exactly once, then recovers.
struct FlakyDriver {
    failed_once: bool,
    inner: EchoDriver,
}

impl PcmIo for FlakyDriver {
    fn send_refine(&mut self, params: &mut HwParams) -> Result<()> {
        self.inner.send_refine(params)
    }

    fn send_commit_hw(&mut self, params: &mut HwParams) -> Result<()> {
        if !self.failed_once {
            self.failed_once = true;
            return Err(Error::Transport(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        self.inner.send_commit_hw(params)
    }

    fn send_commit_sw(&mut self, params: &mut SwParams) -> Result<()> {
        self.inner.send_commit_sw(params)
    }

    fn query_status(&mut self) -> Result<Status> {
        self.inner.query_status()
    }
}

#[test]
fn commit_collapses_and_software_follows() -> Result<()> {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.set(Param::Format, Format::S16Le.into())?;
    nego.set(Param::Channels, 2)?;
    nego.set_range(Param::Rate, 44100, 44100)?;
    nego.set(Param::Access, Access::RwInterleaved.into())?;
    nego.commit(&mut dev)?;

    assert_eq!(nego.state(), NegotiationState::Committed);
    assert_eq!(nego.get(Param::Format, Format::S16Le.into())?, 1);
    assert_eq!(nego.get(Param::Access, Access::RwInterleaved.into())?, 1);
    assert_eq!(nego.get_range(Param::Rate)?, (44100, 44100));

    let (period, period_max) = nego.get_range(Param::PeriodSize)?;
    assert_eq!(period, period_max);

    let sw = nego.software()?;
    assert_eq!(sw.avail_min(), u64::from(period));
    assert_eq!(sw.stop_threshold(), u64::from(nego.get(Param::BufferSize, 0)?));

    let mut sw = sw;
    nego.commit_software(&mut dev, &mut sw)?;

    Ok(())
}

#[test]
fn refine_narrows_and_can_be_repeated() -> Result<()> {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.set_range(Param::Rate, 4000, 400_000)?;
    nego.refine(&mut dev)?;

    // the driver clamped the request to its feasible window
    assert_eq!(nego.get_range(Param::Rate)?, (RATE_MIN, RATE_MAX));
    assert_ne!(nego.params().changed(), 0);

    // react to the narrowed range and negotiate on
    nego.set(Param::Rate, 44100)?;
    nego.refine(&mut dev)?;
    nego.commit(&mut dev)?;

    assert_eq!(nego.get_range(Param::Rate)?, (44100, 44100));
    Ok(())
}

#[test]
fn infeasible_refine_rejects() {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.set_range(Param::Rate, 1, 2).unwrap();

    assert!(matches!(nego.refine(&mut dev), Err(Error::Rejected)));
    assert_eq!(nego.state(), NegotiationState::Rejected);
}

#[test]
fn rejection_is_terminal_until_refill() {
    let mut dev = RejectingDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.set(Param::Channels, 2).unwrap();
    assert!(matches!(nego.commit(&mut dev), Err(Error::Rejected)));
    assert_eq!(nego.state(), NegotiationState::Rejected);

    // a rejected set must not be reused as-is
    assert!(matches!(nego.commit(&mut dev), Err(Error::InvalidState)));
    assert!(matches!(nego.refine(&mut dev), Err(Error::InvalidState)));
    assert!(matches!(
        nego.get(Param::Channels, 0),
        Err(Error::InvalidState)
    ));
    assert!(matches!(nego.software(), Err(Error::InvalidState)));

    // refilling makes the set negotiable again, with different constraints
    nego.fill();
    nego.set(Param::Channels, 1).unwrap();

    let mut good = EchoDriver;
    nego.commit(&mut good).unwrap();
    assert_eq!(nego.state(), NegotiationState::Committed);
    assert_eq!(nego.get_range(Param::Channels).unwrap(), (1, 1));
}

#[test]
fn unfilled_negotiation_cannot_talk_to_the_driver() {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    assert!(matches!(nego.refine(&mut dev), Err(Error::InvalidState)));
    assert!(matches!(nego.commit(&mut dev), Err(Error::InvalidState)));
}

#[test]
fn transport_failure_does_not_poison_the_set() -> Result<()> {
    let mut dev = FlakyDriver {
        failed_once: false,
        inner: EchoDriver,
    };
    let mut nego = Negotiation::new();

    nego.fill();
    nego.set(Param::Channels, 2)?;

    assert!(matches!(nego.commit(&mut dev), Err(Error::Transport(_))));
    // the set was not rejected: the round trip itself failed
    assert_eq!(nego.state(), NegotiationState::Narrowed);

    nego.commit(&mut dev)?;
    assert_eq!(nego.state(), NegotiationState::Committed);
    Ok(())
}

#[test]
fn committed_set_cannot_be_narrowed_further() {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.commit(&mut dev).unwrap();

    assert!(matches!(
        nego.set(Param::Channels, 2),
        Err(Error::InvalidState)
    ));
    assert!(matches!(
        nego.set_range(Param::Rate, 8000, 48000),
        Err(Error::InvalidState)
    ));
}

#[test]
fn explicit_software_thresholds_survive() -> Result<()> {
    let mut dev = EchoDriver;
    let mut nego = Negotiation::new();

    nego.fill();
    nego.commit(&mut dev)?;

    let mut sw = SwParams::new();
    sw.set_avail_min(64);
    sw.set_start_threshold(256);
    nego.derive_software(&mut sw)?;

    assert_eq!(sw.avail_min(), 64);
    assert_eq!(sw.start_threshold(), 256);
    assert_eq!(sw.stop_threshold(), u64::from(nego.get(Param::BufferSize, 0)?));
    Ok(())
}
