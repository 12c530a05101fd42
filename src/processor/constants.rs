//! Sampler configuration constants and limits.

/// Name reported to the host.
pub const PLUGIN_NAME: &str = "BlueSampler";

/// Number of playback voices created at startup.
pub const NUM_VOICES: usize = 16;

/// Number of MIDI notes a sound can be mapped to.
pub const MIDI_NOTE_COUNT: u8 = 128;

/// Note at which a loaded sample plays back at its original pitch.
pub const ROOT_NOTE: u8 = 60;

/// Name given to every loaded sound.
pub const SOUND_NAME: &str = "Sample";

/// Attack time of a freshly loaded sound, in seconds.
pub const DEFAULT_SOUND_ATTACK: f32 = 0.1;

/// Release time of a freshly loaded sound, in seconds.
pub const DEFAULT_SOUND_RELEASE: f32 = 0.1;

/// Longest stretch of source audio kept for playback, in seconds.
pub const MAX_SAMPLE_LENGTH_SECONDS: f64 = 10.0;

/// Playback keeps at most this many channels of a source file.
pub const MAX_SOUND_CHANNELS: usize = 2;

/// Minimum attack time in seconds.
pub const ATTACK_MIN: f32 = 0.0;

/// Maximum attack time in seconds.
pub const ATTACK_MAX: f32 = 5.0;

/// Minimum decay time in seconds.
pub const DECAY_MIN: f32 = 0.0;

/// Maximum decay time in seconds.
pub const DECAY_MAX: f32 = 1.0;

/// Minimum sustain level.
pub const SUSTAIN_MIN: f32 = 0.0;

/// Maximum sustain level.
pub const SUSTAIN_MAX: f32 = 1.0;

/// Minimum release time in seconds.
pub const RELEASE_MIN: f32 = 0.0;

/// Maximum release time in seconds.
pub const RELEASE_MAX: f32 = 1.0;

/// Capacity of the UI -> audio control ring buffer.
pub const CONTROL_QUEUE_CAPACITY: usize = 1024;

/// Capacity of the audio -> UI event ring buffer.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Replaced sounds the audio thread holds until it can hand them back.
pub const MAX_RETIRING_SOUNDS: usize = 32;

/// MIDI events from the UI that can be queued for a single block.
pub const MAX_PENDING_MIDI: usize = 256;

/// Sample rate assumed until the host prepares the processor.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Editor window width in pixels.
pub const EDITOR_WIDTH: f32 = 600.0;

/// Editor window height in pixels.
pub const EDITOR_HEIGHT: f32 = 200.0;

/// Step of every envelope knob.
pub const SLIDER_INTERVAL: f64 = 0.01;

/// Size of the read-only value box under each knob.
pub const SLIDER_TEXT_BOX_WIDTH: f32 = 40.0;
pub const SLIDER_TEXT_BOX_HEIGHT: f32 = 20.0;

/// Font height of the knob captions.
pub const LABEL_FONT_HEIGHT: f32 = 10.0;

/// Stroke width of the waveform trace.
pub const WAVEFORM_STROKE_THICKNESS: f32 = 2.0;
