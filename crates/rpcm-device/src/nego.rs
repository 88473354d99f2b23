use rpcm_core::{HwParams, Param, SwParams};
use tracing::instrument;

use crate::io::PcmIo;
use crate::{Error, Result};

/// Where a parameter set is in its negotiation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Fresh set; nothing is allowed yet. Only [`Negotiation::fill`] is
    /// permitted.
    Unfilled,
    /// Everything allowed, nothing narrowed yet.
    Filled,
    /// The application (or a refine response) has narrowed the space.
    Narrowed,
    /// The driver fixed every parameter to a single value. Terminal
    /// success.
    Committed,
    /// The driver refused the set. Its contents are driver-dependent and
    /// must not be reused; only a refill leaves this state.
    Rejected,
}

/// Drives one parameter set from "everything allowed" to the single
/// configuration the driver runs with.
///
/// The sequence is fill, then any number of local narrowing calls and
/// driver refine rounds, then one commit. Refinement is iterative on
/// purpose: the driver discovers cross-parameter constraints (a rate
/// narrows the feasible buffer sizes, and so on) one response at a time,
/// and the application reacts by narrowing further and refining again.
///
/// One negotiation configures one stream; negotiating two streams means
/// two independent `Negotiation` values with nothing shared.
pub struct Negotiation {
    params: HwParams,
    state: NegotiationState,
}

impl Negotiation {
    pub fn new() -> Negotiation {
        Negotiation {
            params: HwParams::new(),
            state: NegotiationState::Unfilled,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// The underlying parameter set. Reading collapsed values through
    /// [`Negotiation::get`]/[`Negotiation::get_range`] is preferred; this
    /// exists for transports and diagnostics.
    pub fn params(&self) -> &HwParams {
        &self.params
    }

    /// Establishes (or re-establishes, after a rejection) the
    /// all-values-allowed entry state.
    pub fn fill(&mut self) {
        self.params.fill();
        self.state = NegotiationState::Filled;
    }

    /// Narrows one parameter to a value.
    pub fn set(&mut self, param: Param, value: u32) -> Result<()> {
        self.narrowable()?;
        self.params.set(param, value);
        self.state = NegotiationState::Narrowed;
        Ok(())
    }

    /// Narrows an interval parameter to a range.
    pub fn set_range(&mut self, param: Param, min: u32, max: u32) -> Result<()> {
        self.narrowable()?;
        self.params.set_range(param, min, max);
        self.state = NegotiationState::Narrowed;
        Ok(())
    }

    pub fn get(&self, param: Param, value: u32) -> Result<u32> {
        self.readable()?;
        Ok(self.params.get(param, value))
    }

    pub fn get_range(&self, param: Param) -> Result<(u32, u32)> {
        self.readable()?;
        Ok(self.params.get_range(param))
    }

    /// One refine round trip: the driver narrows any subset of the
    /// parameters and reports what it changed. May be repeated; a
    /// rejection means the current constraints are infeasible together
    /// and the set must be refilled.
    #[instrument(level = "trace", skip_all, err)]
    pub fn refine<D: PcmIo>(&mut self, dev: &mut D) -> Result<()> {
        self.narrowable()?;
        match dev.send_refine(&mut self.params) {
            Ok(()) => {
                tracing::debug!(changed = self.params.changed(), "refine narrowed the space");
                self.state = NegotiationState::Narrowed;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// The final round trip: the driver fixes every parameter to one
    /// value and prepares the device, or rejects the set.
    #[instrument(level = "trace", skip_all, err)]
    pub fn commit<D: PcmIo>(&mut self, dev: &mut D) -> Result<()> {
        self.narrowable()?;
        match dev.send_commit_hw(&mut self.params) {
            Ok(()) => {
                self.state = NegotiationState::Committed;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Fills software thresholds the application left unset from the
    /// committed hardware parameters.
    pub fn derive_software(&self, sw: &mut SwParams) -> Result<()> {
        self.committed()?;
        sw.apply_defaults(&self.params);
        Ok(())
    }

    /// Fully derived software parameters for the committed configuration.
    pub fn software(&self) -> Result<SwParams> {
        let mut sw = SwParams::new();
        self.derive_software(&mut sw)?;
        Ok(sw)
    }

    /// Sends the software parameters. A single set-then-send round trip;
    /// there is no software refinement phase.
    #[instrument(level = "trace", skip_all, err)]
    pub fn commit_software<D: PcmIo>(&self, dev: &mut D, sw: &mut SwParams) -> Result<()> {
        self.committed()?;
        dev.send_commit_sw(sw)
    }

    fn fail(&mut self, error: Error) -> Error {
        if matches!(error, Error::Rejected) {
            tracing::debug!("driver rejected the constraint set");
            self.state = NegotiationState::Rejected;
        }
        error
    }

    fn narrowable(&self) -> Result<()> {
        match self.state {
            NegotiationState::Filled | NegotiationState::Narrowed => Ok(()),
            _ => Err(Error::InvalidState),
        }
    }

    fn readable(&self) -> Result<()> {
        match self.state {
            NegotiationState::Filled
            | NegotiationState::Narrowed
            | NegotiationState::Committed => Ok(()),
            _ => Err(Error::InvalidState),
        }
    }

    fn committed(&self) -> Result<()> {
        match self.state {
            NegotiationState::Committed => Ok(()),
            _ => Err(Error::InvalidState),
        }
    }
}

impl Default for Negotiation {
    fn default() -> Negotiation {
        Negotiation::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_negotiation_refuses_everything_but_fill() {
        let mut nego = Negotiation::new();

        assert!(matches!(
            nego.set(Param::Channels, 2),
            Err(Error::InvalidState)
        ));
        assert!(matches!(nego.get(Param::Channels, 0), Err(Error::InvalidState)));
        assert_eq!(nego.state(), NegotiationState::Unfilled);
    }

    #[test]
    fn narrowing_moves_filled_to_narrowed() {
        let mut nego = Negotiation::new();
        nego.fill();
        assert_eq!(nego.state(), NegotiationState::Filled);

        nego.set(Param::Channels, 2).unwrap();
        assert_eq!(nego.state(), NegotiationState::Narrowed);
        assert_eq!(nego.get_range(Param::Channels).unwrap(), (2, 2));
    }
}
