use thiserror::Error;

/// Why a command was refused. Never sent to the client: the coordinator logs
/// it and drops the command.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("sender does not hold the picker role")]
    NotPicker,
    #[error("wheel is already spinning")]
    AlreadySpinning,
    #[error("wheel has no options to draw from")]
    NoOptions,
    #[error("options are locked until the spin is revealed")]
    OptionsLocked,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server stopped unexpectedly: {0}")]
    Serve(#[from] std::io::Error),
}
