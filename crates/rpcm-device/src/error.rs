use std::io;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The operation is not permitted in the negotiation's current state,
    /// e.g. refining before filling or narrowing a rejected set. A caller
    /// bug, not a driver verdict.
    #[error("operation not valid in the current negotiation state")]
    InvalidState,

    /// The driver refused the constraint set: no configuration satisfies
    /// it. Terminal for this attempt; refill and narrow differently.
    #[error("constraint set rejected by the driver")]
    Rejected,

    /// The round trip to the driver itself failed. Surfaced as-is, never
    /// interpreted here.
    #[error("transport error")]
    Transport(#[source] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
