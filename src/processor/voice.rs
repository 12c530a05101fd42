//! Sample playback voice.
//!
//! This module provides the [`SamplerVoice`] struct which renders one note of
//! a [`SamplerSound`] with its own playback position, pitch and envelope.
//!
//! Voices are owned by the [`Sampler`](crate::processor::sampler::Sampler)
//! and reused across notes and sounds.

use std::sync::Arc;

use crate::processor::adsr::{Adsr, EnvelopeStage};
use crate::processor::constants::DEFAULT_SAMPLE_RATE;
use crate::processor::sound::{EnvelopeTarget, SamplerSound, SoundData};

fn interpolate(channel: &[f32], pos: usize, alpha: f32) -> f32 {
    let current = channel.get(pos).copied().unwrap_or(0.0);
    let next = channel.get(pos + 1).copied().unwrap_or(0.0);
    current * (1.0 - alpha) + next * alpha
}

/// A single voice of the sampler.
#[derive(Debug)]
pub struct SamplerVoice {
    /// Audio of the sound being played, `None` while the voice is free.
    sound: Option<Arc<SoundData>>,

    /// MIDI note being played.
    note: u8,

    /// Whether the note is still held.
    key_down: bool,

    /// Note-on order, used to pick the oldest voice when stealing.
    note_on_time: u64,

    /// Source frames advanced per output frame.
    pitch_ratio: f64,

    /// Fractional read position in source frames.
    source_position: f64,

    left_gain: f32,
    right_gain: f32,
    sample_rate: f64,
    adsr: Adsr,
}

impl Default for SamplerVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerVoice {
    /// Creates a free voice.
    pub fn new() -> Self {
        let mut adsr = Adsr::new();
        adsr.set_sample_rate(DEFAULT_SAMPLE_RATE);
        Self {
            sound: None,
            note: 0,
            key_down: false,
            note_on_time: 0,
            pitch_ratio: 1.0,
            source_position: 0.0,
            left_gain: 0.0,
            right_gain: 0.0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            adsr,
        }
    }

    pub fn set_current_playback_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.adsr.set_sample_rate(sample_rate);
    }

    pub fn is_active(&self) -> bool {
        self.sound.is_some()
    }

    pub fn current_note(&self) -> Option<u8> {
        self.sound.as_ref().map(|_| self.note)
    }

    pub fn is_playing_note(&self, note: u8) -> bool {
        self.current_note() == Some(note)
    }

    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    /// True while the voice is fading out after its note was released.
    pub fn is_releasing(&self) -> bool {
        self.is_active() && self.adsr.stage() == EnvelopeStage::Release
    }

    pub fn note_on_time(&self) -> u64 {
        self.note_on_time
    }

    pub fn pitch_ratio(&self) -> f64 {
        self.pitch_ratio
    }

    /// Audio the voice is reading from, if any.
    pub fn sound_data(&self) -> Option<&Arc<SoundData>> {
        self.sound.as_ref()
    }

    /// Starts playing `sound` at the pitch of `note`.
    ///
    /// # Parameters
    ///
    /// - `note`: MIDI note number
    /// - `velocity`: Gain applied to both channels (0.0 to 1.0)
    /// - `sound`: The sound to play; its envelope is captured now
    /// - `note_on_time`: Monotonic counter value for voice stealing
    pub fn start_note(&mut self, note: u8, velocity: f32, sound: &SamplerSound, note_on_time: u64) {
        let data = sound.data();
        let semitones = f64::from(note) - f64::from(sound.root_note());
        self.pitch_ratio =
            2.0_f64.powf(semitones / 12.0) * data.source_sample_rate() / self.sample_rate;

        self.sound = Some(Arc::clone(data));
        self.note = note;
        self.key_down = true;
        self.note_on_time = note_on_time;
        self.source_position = 0.0;
        self.left_gain = velocity;
        self.right_gain = velocity;

        self.adsr.set_sample_rate(self.sample_rate);
        self.adsr.set_parameters(sound.envelope());
        self.adsr.note_on();
    }

    /// Stops the note, either through the release stage or immediately.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        self.key_down = false;

        if allow_tail_off {
            self.adsr.note_off();
            if !self.adsr.is_active() {
                self.clear_current_note();
            }
        } else {
            self.clear_current_note();
        }
    }

    fn clear_current_note(&mut self) {
        self.sound = None;
        self.key_down = false;
        self.source_position = 0.0;
        self.adsr.reset();
    }

    /// Adds this voice's output to `outputs[..][start..start + num]`.
    ///
    /// With one output channel the left and right signals are averaged;
    /// mono sounds feed both channels of a stereo output.
    pub fn render_next_block(&mut self, outputs: &mut [&mut [f32]], start: usize, num: usize) {
        let Some(data) = self.sound.as_ref().map(Arc::clone) else {
            return;
        };

        let Some(left_in) = data.channel(0) else {
            self.clear_current_note();
            return;
        };
        let right_in = data.channel(1);
        let length = data.length();

        let Some((left_out, rest)) = outputs.split_first_mut() else {
            return;
        };
        let mut right_out = rest.first_mut();

        let mut end = (start + num).min(left_out.len());
        if let Some(right) = right_out.as_ref() {
            end = end.min(right.len());
        }

        for i in start..end {
            let pos = self.source_position as usize;
            let alpha = (self.source_position - pos as f64) as f32;

            let l = interpolate(left_in, pos, alpha);
            let r = right_in.map_or(l, |right| interpolate(right, pos, alpha));

            let envelope = self.adsr.next_sample();
            let l = l * self.left_gain * envelope;
            let r = r * self.right_gain * envelope;

            if let Some(right) = right_out.as_mut() {
                left_out[i] += l;
                right[i] += r;
            } else {
                left_out[i] += (l + r) * 0.5;
            }

            self.source_position += self.pitch_ratio;

            if self.source_position > length as f64 || !self.adsr.is_active() {
                self.clear_current_note();
                break;
            }
        }
    }
}
