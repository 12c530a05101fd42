//! Playable sounds and the MIDI notes they respond to.

use std::sync::Arc;

use crate::processor::adsr::AdsrParams;
use crate::processor::channels::deinterleave;
use crate::processor::constants::{MAX_SOUND_CHANNELS, MIDI_NOTE_COUNT};
use crate::processor::sample_loader::DecodedAudio;

/// Set of MIDI notes, one bit per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MidiNoteSet(u128);

impl MidiNoteSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every note from 0 to 127.
    pub const fn full() -> Self {
        Self(u128::MAX)
    }

    /// Notes `start..start + len`, clipped to the MIDI range.
    pub fn with_range(start: u8, len: u8) -> Self {
        let start = u32::from(start.min(MIDI_NOTE_COUNT));
        let end = (start + u32::from(len)).min(u32::from(MIDI_NOTE_COUNT));

        let mut set = Self::empty();
        for note in start..end {
            set.0 |= 1u128 << note;
        }
        set
    }

    pub fn contains(&self, note: u8) -> bool {
        note < MIDI_NOTE_COUNT && self.0 & (1u128 << note) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn lowest(&self) -> Option<u8> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as u8)
    }

    pub fn highest(&self) -> Option<u8> {
        (!self.is_empty()).then(|| 127 - self.0.leading_zeros() as u8)
    }
}

/// Anything that carries envelope settings the processor can overwrite.
pub trait EnvelopeTarget {
    fn set_envelope(&mut self, params: AdsrParams);

    fn envelope(&self) -> AdsrParams;
}

/// Immutable planar audio shared between a sound and the voices playing it.
#[derive(Debug)]
pub struct SoundData {
    channels: Vec<Vec<f32>>,
    source_sample_rate: f64,
    length: usize,
}

impl SoundData {
    pub fn new(channels: Vec<Vec<f32>>, source_sample_rate: f64) -> Self {
        let length = channels.iter().map(Vec::len).min().unwrap_or(0);
        Self {
            channels,
            source_sample_rate,
            length,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|channel| &channel[..self.length])
    }

    pub fn source_sample_rate(&self) -> f64 {
        self.source_sample_rate
    }

    /// Length in frames.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A loaded sample mapped onto a range of MIDI notes.
#[derive(Debug)]
pub struct SamplerSound {
    name: String,
    data: Arc<SoundData>,
    midi_notes: MidiNoteSet,
    root_note: u8,
    params: AdsrParams,
}

impl SamplerSound {
    /// Creates a sound from decoded audio.
    ///
    /// # Parameters
    ///
    /// - `name`: Display name of the sound
    /// - `audio`: Decoded source audio
    /// - `midi_notes`: Notes that trigger this sound
    /// - `root_note`: Note at which the sample plays at its original pitch
    /// - `attack_secs`, `release_secs`: Initial envelope timing
    /// - `max_sample_length_secs`: Source audio beyond this length is dropped
    pub fn new(
        name: impl Into<String>,
        audio: &DecodedAudio,
        midi_notes: MidiNoteSet,
        root_note: u8,
        attack_secs: f32,
        release_secs: f32,
        max_sample_length_secs: f64,
    ) -> Self {
        let source_sample_rate = f64::from(audio.sample_rate);
        let max_frames = (max_sample_length_secs * source_sample_rate).max(0.0) as usize;
        let channels = deinterleave(
            &audio.samples,
            audio.channels,
            MAX_SOUND_CHANNELS,
            max_frames,
        );

        Self {
            name: name.into(),
            data: Arc::new(SoundData::new(channels, source_sample_rate)),
            midi_notes,
            root_note,
            params: AdsrParams {
                attack: attack_secs,
                release: release_secs,
                ..AdsrParams::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Arc<SoundData> {
        &self.data
    }

    pub fn midi_notes(&self) -> MidiNoteSet {
        self.midi_notes
    }

    pub fn root_note(&self) -> u8 {
        self.root_note
    }

    pub fn applies_to_note(&self, note: u8) -> bool {
        self.midi_notes.contains(note)
    }

    pub fn applies_to_channel(&self, _channel: u8) -> bool {
        true
    }
}

impl EnvelopeTarget for SamplerSound {
    fn set_envelope(&mut self, params: AdsrParams) {
        self.params = params;
    }

    fn envelope(&self) -> AdsrParams {
        self.params
    }
}
