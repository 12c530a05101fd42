//! Real-time sample playback engine.
//!
//! This module provides the [`Sampler`] struct which owns a fixed pool of
//! [`SamplerVoice`]s and the currently loaded [`SamplerSound`]s, turns MIDI
//! events into voice starts and stops and mixes the voices into the output.
//!
//! Nothing in here allocates once the sampler has been constructed, so it is
//! safe to drive from the audio callback.

use std::sync::Arc;
use std::vec::Drain;

use crate::processor::adsr::AdsrParams;
use crate::processor::midi::{MidiEvent, MidiMessage};
use crate::processor::sound::{EnvelopeTarget, SamplerSound, SoundData};
use crate::processor::voice::SamplerVoice;

/// Voice pool plus the sounds it can play.
#[derive(Debug)]
pub struct Sampler {
    /// Voices, created once and reused.
    voices: Vec<SamplerVoice>,

    /// Loaded sounds.
    sounds: Vec<SamplerSound>,

    /// Output sample rate in Hz.
    sample_rate: f64,

    /// Incremented for every started note.
    last_note_on_counter: u64,
}

impl Sampler {
    /// Creates a sampler with `num_voices` voices and no sounds.
    pub fn new(num_voices: usize) -> Self {
        Self {
            voices: (0..num_voices).map(|_| SamplerVoice::new()).collect(),
            sounds: Vec::with_capacity(1),
            sample_rate: 0.0,
            last_note_on_counter: 0,
        }
    }

    pub fn num_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[SamplerVoice] {
        &self.voices
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_active()).count()
    }

    pub fn add_sound(&mut self, sound: SamplerSound) {
        self.sounds.push(sound);
    }

    /// Removes every sound and hands them to the caller. Voices already
    /// playing keep their audio until they finish.
    pub fn take_sounds(&mut self) -> Drain<'_, SamplerSound> {
        self.sounds.drain(..)
    }

    pub fn num_sounds(&self) -> usize {
        self.sounds.len()
    }

    pub fn sound(&self, index: usize) -> Option<&SamplerSound> {
        self.sounds.get(index)
    }

    pub fn sounds(&self) -> &[SamplerSound] {
        &self.sounds
    }

    /// Pushes envelope settings into every loaded sound.
    ///
    /// Notes that are already sounding keep the envelope they started with.
    pub fn update_envelopes(&mut self, params: AdsrParams) {
        for sound in &mut self.sounds {
            sound.set_envelope(params);
        }
    }

    /// Whether any voice is still reading from `data`.
    pub fn is_using(&self, data: &Arc<SoundData>) -> bool {
        self.voices
            .iter()
            .any(|voice| voice.sound_data().is_some_and(|playing| Arc::ptr_eq(playing, data)))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Sets the output sample rate. Changing it silences all voices.
    pub fn set_current_playback_sample_rate(&mut self, sample_rate: f64) {
        if self.sample_rate == sample_rate {
            return;
        }

        self.sample_rate = sample_rate;
        self.all_notes_off(false);
        for voice in &mut self.voices {
            voice.set_current_playback_sample_rate(sample_rate);
        }
    }

    /// Starts `note` on every sound mapped to it.
    ///
    /// A voice already sounding the same note is released first. A velocity
    /// of zero releases the note instead.
    pub fn note_on(&mut self, channel: u8, note: u8, velocity: f32) {
        if !velocity.is_finite() || velocity <= 0.0 {
            self.note_off(channel, note, true);
            return;
        }
        let velocity = velocity.min(1.0);

        for sound_index in 0..self.sounds.len() {
            let sound = &self.sounds[sound_index];
            if !sound.applies_to_note(note) || !sound.applies_to_channel(channel) {
                continue;
            }

            for voice in &mut self.voices {
                if voice.is_playing_note(note) && voice.is_key_down() {
                    voice.stop_note(true);
                }
            }

            let Some(voice_index) = self.find_free_voice() else {
                continue;
            };

            self.last_note_on_counter += 1;
            let sound = &self.sounds[sound_index];
            let voice = &mut self.voices[voice_index];
            voice.stop_note(false);
            voice.start_note(note, velocity, sound, self.last_note_on_counter);
        }
    }

    /// Releases every held voice playing `note`.
    pub fn note_off(&mut self, _channel: u8, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_playing_note(note) && voice.is_key_down() {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Stops all active voices.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    pub fn handle_midi_event(&mut self, message: &MidiMessage) {
        match *message {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => self.note_on(channel, note, velocity),
            MidiMessage::NoteOff { channel, note, .. } => self.note_off(channel, note, true),
            MidiMessage::AllNotesOff { .. } => self.all_notes_off(true),
        }
    }

    /// Renders `num` frames starting at `start`, applying each MIDI event at
    /// its sample offset.
    ///
    /// Voices add into `outputs`; the caller clears the buffer. Events are
    /// expected in offset order, offsets outside the rendered range are
    /// clamped to it.
    pub fn render_next_block(
        &mut self,
        outputs: &mut [&mut [f32]],
        midi: &[MidiEvent],
        start: usize,
        num: usize,
    ) {
        let end = start + num;
        let mut position = start;

        for event in midi {
            let at = event.sample_offset.clamp(position, end);
            self.render_voices(outputs, position, at - position);
            self.handle_midi_event(&event.message);
            position = at;
        }

        self.render_voices(outputs, position, end - position);
    }

    fn render_voices(&mut self, outputs: &mut [&mut [f32]], start: usize, num: usize) {
        if num == 0 {
            return;
        }

        for voice in &mut self.voices {
            voice.render_next_block(outputs, start, num);
        }
    }

    /// Picks a voice for a new note: a free one, else the oldest releasing
    /// voice, else the oldest voice.
    fn find_free_voice(&self) -> Option<usize> {
        if let Some(index) = self.voices.iter().position(|voice| !voice.is_active()) {
            return Some(index);
        }

        let oldest = |releasing: bool| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, voice)| !releasing || voice.is_releasing())
                .min_by_key(|(_, voice)| voice.note_on_time())
                .map(|(index, _)| index)
        };

        oldest(true).or_else(|| oldest(false))
    }
}
