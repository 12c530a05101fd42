//! MIDI events consumed by the sampler.

/// Channel-voice messages the sampler reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiMessage {
    /// Start a note. A velocity of zero is treated as a note-off.
    NoteOn { channel: u8, note: u8, velocity: f32 },

    /// Release a note.
    NoteOff { channel: u8, note: u8, velocity: f32 },

    /// Release every sounding note on a channel.
    AllNotesOff { channel: u8 },
}

/// A MIDI message with its position inside the current audio block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent {
    /// Offset in frames from the start of the block.
    pub sample_offset: usize,
    pub message: MidiMessage,
}

impl MidiEvent {
    pub fn new(sample_offset: usize, message: MidiMessage) -> Self {
        Self {
            sample_offset,
            message,
        }
    }

    pub fn note_on(sample_offset: usize, note: u8, velocity: f32) -> Self {
        Self::new(
            sample_offset,
            MidiMessage::NoteOn {
                channel: 1,
                note,
                velocity,
            },
        )
    }

    pub fn note_off(sample_offset: usize, note: u8) -> Self {
        Self::new(
            sample_offset,
            MidiMessage::NoteOff {
                channel: 1,
                note,
                velocity: 0.0,
            },
        )
    }
}
