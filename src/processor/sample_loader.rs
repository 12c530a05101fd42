//! Audio file loading and decoding functionality.
//!
//! This module decodes audio files into interleaved `f32` buffers that the
//! processor turns into a playable sound and a waveform for the editor.

use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer,
    codecs::{CodecRegistry, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::{Hint, Probe},
};

use crate::processor::constants::MAX_SAMPLE_LENGTH_SECONDS;
use crate::processor::errors::SampleLoadError;

/// Fully decoded audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Number of interleaved channels.
    pub channels: usize,

    /// Sample rate of the source file in Hz.
    pub sample_rate: u32,

    /// Interleaved samples in the range -1.0 to 1.0.
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }
}

fn map_symphonia_error(err: SymphoniaError, path: &Path) -> SampleLoadError {
    match err {
        SymphoniaError::Unsupported(_) => SampleLoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        },
        SymphoniaError::IoError(err) => SampleLoadError::Io(err),
        err => SampleLoadError::DecodeFailed(err),
    }
}

/// Decodes the default track of an audio file.
///
/// # Parameters
///
/// - `path`: Path to the audio file to load
/// - `probe`: Format readers to detect the container with
/// - `codecs`: Decoders to pick the track's codec from
///
/// # Errors
///
/// - `Io` when the file cannot be opened
/// - `UnsupportedFormat` when no reader or decoder matches
/// - `DecodeFailed` for corrupt container data
/// - `NoDefaultTrack`, `MissingSampleRate`, `MissingChannels` for incomplete streams
pub fn decode_audio_file(
    path: &Path,
    probe: &Probe,
    codecs: &CodecRegistry,
) -> Result<DecodedAudio, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = probe
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| map_symphonia_error(err, path))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = codecs
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| map_symphonia_error(err, path))?;

    let mut decoded: Vec<f32> = Vec::new();
    if let (Some(frames), Some(count)) = (track.codec_params.n_frames, channels) {
        // The header's frame count is untrusted; only pre-size up to the playable length.
        let playable = (MAX_SAMPLE_LENGTH_SECONDS * f64::from(sample_rate)) as u64;
        let expected = usize::try_from(frames.min(playable))
            .ok()
            .and_then(|frames| frames.checked_mul(count));
        if let Some(len) = expected {
            if decoded.try_reserve(len).is_err() {
                log::warn!("Could not pre-allocate {len} samples for {}", path.display());
            }
        }
    }

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(SampleLoadError::DecodeFailed(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping corrupt packet in {}: {msg}", path.display());
                continue;
            }
            Err(err) => return Err(SampleLoadError::DecodeFailed(err)),
        };

        let spec = *audio_buf.spec();
        channels.get_or_insert(spec.channels.count());
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    let channels = channels
        .filter(|count| *count > 0)
        .ok_or(SampleLoadError::MissingChannels)?;

    log::debug!(
        "Decoded {} ({} ch@{} Hz, {} frames)",
        path.display(),
        channels,
        sample_rate,
        decoded.len() / channels
    );

    Ok(DecodedAudio {
        channels,
        sample_rate,
        samples: decoded,
    })
}
