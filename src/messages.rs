//! Message definitions for communication between the UI thread and the audio thread.
//!
//! This module defines the enums that serve as the wire format for messages passed through the
//! ring buffers between the editor side of the processor and the real-time audio thread.

use crate::processor::midi::MidiEvent;
use crate::processor::sound::SamplerSound;

/// Message that is emitted from the UI side.
#[derive(Debug)]
pub enum ControlMessage {
    /// Clear every loaded sound and add this one in its place.
    ReplaceSound(SamplerSound),

    /// A MIDI message to apply at the start of the next block.
    Midi(MidiEvent),
}

/// Message that is emitted from the audio thread.
#[derive(Debug)]
pub enum AudioMessage {
    /// A replacement sound is now playable.
    ///
    /// # Parameters
    /// * `frames` - Length of the new sound in source frames
    SoundReplaced { frames: usize },

    /// A sound removed from the sampler.
    ///
    /// Handed back so its sample data is freed on the receiving thread
    /// rather than inside the audio callback.
    SoundRetired(SamplerSound),
}
