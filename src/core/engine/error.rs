use thiserror::Error;

/// Failures raised by the tone engine and its audio host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The host has no usable audio output.
    #[error("audio output is not supported on this system")]
    Unsupported,
    /// Building the output stream or graph failed.
    #[error("failed to create audio resources: {0}")]
    ResourceCreation(String),
    /// The output stream could not be started.
    #[error("failed to resume audio output: {0}")]
    Resume(String),
    #[error("frequency must be a positive number of hertz, got {0}")]
    InvalidFrequency(f32),
    /// Stopping a source that already ended.
    #[error("tone source already stopped")]
    AlreadyStopped,
    #[error("audio graph lock poisoned")]
    GraphPoisoned,
}
