//! Registry of the audio formats the sampler can read.
//!
//! The registry is constructed explicitly and handed to the processor. It
//! owns its own symphonia probe and codec tables instead of reaching for the
//! process-wide defaults.

use std::path::Path;

use symphonia::core::codecs::CodecRegistry;
use symphonia::core::probe::Probe;
use symphonia::default::{register_enabled_codecs, register_enabled_formats};

use crate::processor::errors::SampleLoadError;
use crate::processor::sample_loader::{DecodedAudio, decode_audio_file};

/// A readable audio format and the file extensions it claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const WAV: AudioFormat = AudioFormat {
    name: "WAV file",
    extensions: &["wav"],
};

pub const AIFF: AudioFormat = AudioFormat {
    name: "AIFF file",
    extensions: &["aif", "aiff", "aifc"],
};

pub const MP3: AudioFormat = AudioFormat {
    name: "MP3 file",
    extensions: &["mp3"],
};

pub const FLAC: AudioFormat = AudioFormat {
    name: "FLAC file",
    extensions: &["flac"],
};

pub const OGG_VORBIS: AudioFormat = AudioFormat {
    name: "Ogg-Vorbis file",
    extensions: &["ogg"],
};

/// Audio formats that can be turned into [`DecodedAudio`].
pub struct FormatRegistry {
    formats: Vec<AudioFormat>,
    probe: Probe,
    codecs: CodecRegistry,
}

impl FormatRegistry {
    /// Creates a registry that knows no formats.
    pub fn new() -> Self {
        let mut probe = Probe::default();
        register_enabled_formats(&mut probe);

        let mut codecs = CodecRegistry::new();
        register_enabled_codecs(&mut codecs);

        Self {
            formats: Vec::new(),
            probe,
            codecs,
        }
    }

    /// Creates a registry with WAV, AIFF, MP3, FLAC and Ogg Vorbis registered.
    pub fn with_basic_formats() -> Self {
        let mut registry = Self::new();
        for format in [WAV, AIFF, MP3, FLAC, OGG_VORBIS] {
            registry.register_format(format);
        }
        registry
    }

    /// Registers a format. Registering the same format twice is a no-op.
    pub fn register_format(&mut self, format: AudioFormat) {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
    }

    pub fn formats(&self) -> &[AudioFormat] {
        &self.formats
    }

    /// Finds the format responsible for a path by its extension.
    pub fn find_format_for(&self, path: &Path) -> Option<AudioFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.formats
            .iter()
            .find(|format| format.extensions.contains(&extension.as_str()))
            .copied()
    }

    /// Wildcard pattern covering every registered extension, e.g.
    /// `*.wav;*.aif`.
    pub fn wildcard_for_all_formats(&self) -> String {
        self.formats
            .iter()
            .flat_map(|format| format.extensions.iter())
            .map(|extension| format!("*.{extension}"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Decodes a file with one of the registered formats.
    pub fn create_reader_for(&self, path: &Path) -> Result<DecodedAudio, SampleLoadError> {
        if self.find_format_for(path).is_none() {
            return Err(SampleLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        decode_audio_file(path, &self.probe, &self.codecs)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_basic_formats()
    }
}
