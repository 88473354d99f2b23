use nix::errno::Errno;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to open {path}")]
    Open {
        path: String,
        #[source]
        source: Errno,
    },

    #[error("device request failed")]
    Device(#[from] Errno),

    #[error("driver reported unknown device state {0}")]
    UnknownState(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
