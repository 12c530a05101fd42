//! Sampler-specific error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a sample into the sampler.
///
/// All of them are non-fatal: the previously loaded sound keeps playing and
/// the editor shows the message in its status line.
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// The file dialog was cancelled.
    #[error("no file selected")]
    NoFileSelected,

    /// No registered format can read the file.
    #[error("unsupported audio format: {}", path.display())]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: PathBuf,
    },

    /// The file was recognised but could not be decoded.
    #[error("failed to decode audio file: {0}")]
    DecodeFailed(#[from] symphonia::core::errors::Error),

    /// The file decoded to zero frames.
    #[error("audio file contains no samples")]
    EmptyFile,

    /// Failed to open the audio file.
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Audio file has no default track.
    #[error("audio file has no default track")]
    NoDefaultTrack,

    /// Audio file is missing sample rate information.
    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    /// Audio file is missing channel information.
    #[error("audio file is missing channel information")]
    MissingChannels,

    /// The audio thread has not drained earlier control messages yet.
    #[error("failed to send sound to the audio thread - queue may be full")]
    QueueFull,
}

/// Errors raised when queueing live control input for the audio thread.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The audio thread has not drained earlier control messages yet.
    #[error("failed to send control message - queue may be full")]
    QueueFull,
}
