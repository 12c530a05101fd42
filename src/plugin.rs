//! Host plugin contract.
//!
//! The lifecycle hooks a plugin host expects from a processor, independent of
//! any particular plugin format. The standalone audio stream drives the same
//! hooks a host would.

use crate::processor::midi::MidiEvent;

// =============================================================================
// Bus Configuration
// =============================================================================

/// Channel layout of a single audio bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelSet {
    /// The bus is not in use.
    #[default]
    Disabled,
    Mono,
    Stereo,
    /// Any other channel count.
    Discrete(usize),
}

impl ChannelSet {
    pub fn channel_count(self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Discrete(count) => count,
        }
    }

    /// The named set for a channel count.
    pub fn from_channel_count(count: usize) -> Self {
        match count {
            0 => Self::Disabled,
            1 => Self::Mono,
            2 => Self::Stereo,
            count => Self::Discrete(count),
        }
    }
}

/// Main input and output bus of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusesLayout {
    pub main_input: ChannelSet,
    pub main_output: ChannelSet,
}

impl BusesLayout {
    /// Output only, as used by instruments.
    pub const fn instrument(output: ChannelSet) -> Self {
        Self {
            main_input: ChannelSet::Disabled,
            main_output: output,
        }
    }

    /// Matching input and output, as used by effects.
    pub const fn effect(channels: ChannelSet) -> Self {
        Self {
            main_input: channels,
            main_output: channels,
        }
    }

    /// Mono or stereo output only. Unless `is_instrument` is set the input
    /// must match the output.
    pub fn is_supported(&self, is_instrument: bool) -> bool {
        if !matches!(self.main_output, ChannelSet::Mono | ChannelSet::Stereo) {
            return false;
        }

        is_instrument || self.main_input == self.main_output
    }
}

impl Default for BusesLayout {
    fn default() -> Self {
        Self::instrument(ChannelSet::Stereo)
    }
}

// =============================================================================
// AudioPlugin Trait
// =============================================================================

/// Lifecycle hooks a plugin host calls on a processor.
///
/// # Thread Safety
///
/// [`process_block`](AudioPlugin::process_block) runs on the audio thread and
/// must be real-time safe: no allocations, no locks, no I/O. Everything else
/// is called from the host's main thread.
pub trait AudioPlugin: Send {
    /// Editor type returned by [`create_editor`](AudioPlugin::create_editor).
    type Editor;

    fn name(&self) -> &str;

    fn accepts_midi(&self) -> bool;

    fn produces_midi(&self) -> bool;

    fn is_midi_effect(&self) -> bool {
        false
    }

    fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Some hosts misbehave with zero programs, so at least one is reported.
    fn num_programs(&self) -> usize {
        1
    }

    fn current_program(&self) -> usize {
        0
    }

    fn set_current_program(&mut self, _index: usize) {}

    fn program_name(&self, _index: usize) -> String {
        String::new()
    }

    fn change_program_name(&mut self, _index: usize, _new_name: &str) {}

    /// Called before playback starts and whenever the sample rate or maximum
    /// block size changes.
    fn prepare_to_play(&mut self, sample_rate: f64, samples_per_block: usize);

    /// Called when playback stops.
    fn release_resources(&mut self);

    fn is_buses_layout_supported(&self, layout: &BusesLayout) -> bool;

    /// Renders one block in place.
    ///
    /// # Arguments
    ///
    /// * `buffer` - One slice per output channel, all of the same length;
    ///   the first input-count channels hold the input signal
    /// * `midi` - Events for this block, ordered by sample offset
    fn process_block(&mut self, buffer: &mut [&mut [f32]], midi: &[MidiEvent]);

    fn has_editor(&self) -> bool;

    fn create_editor(&self) -> Option<Self::Editor>;

    /// Serialises the plugin state.
    fn state_information(&self) -> Vec<u8>;

    /// Restores state produced by [`state_information`](AudioPlugin::state_information).
    fn set_state_information(&mut self, data: &[u8]);
}
