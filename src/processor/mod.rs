//! Sampler Processor Module
//!
//! This module provides the audio side of the plugin and the playback engine it
//! owns. It is organized into sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management for standalone use
//! - [`constants`]: Configuration constants and limits
//! - [`errors`]: Sampler-specific error types
//! - [`adsr`]: Envelope generator and its lock-free parameter snapshot
//! - [`format_registry`]: Registered audio formats and reader creation
//! - [`sample_loader`]: Audio file decoding
//! - [`sound`]: Loaded sounds and their note mapping
//! - [`voice`]: Single-note playback
//! - [`sampler`]: Voice pool and MIDI dispatch
//!
//! The [`SamplerProcessor`] runs on the audio thread. Its [`ProcessorHandle`]
//! is the UI-side half: it loads files, edits the envelope and forwards live
//! notes, talking to the audio thread only through ring buffers and atomics.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::editor::SamplerEditor;
use crate::messages::{AudioMessage, ControlMessage};
use crate::plugin::{AudioPlugin, BusesLayout};
use crate::processor::adsr::{AdsrParams, SharedAdsr};
use crate::processor::channels::extract_channel;
use crate::processor::constants::{
    CONTROL_QUEUE_CAPACITY, DEFAULT_SOUND_ATTACK, DEFAULT_SOUND_RELEASE, EVENT_QUEUE_CAPACITY,
    MAX_PENDING_MIDI, MAX_RETIRING_SOUNDS, MAX_SAMPLE_LENGTH_SECONDS, NUM_VOICES, PLUGIN_NAME,
    ROOT_NOTE, SOUND_NAME,
};
use crate::processor::errors::{ControlError, SampleLoadError};
use crate::processor::file_chooser::{FileChooser, NoFileChooser};
use crate::processor::format_registry::FormatRegistry;
use crate::processor::midi::{MidiEvent, MidiMessage};
use crate::processor::sample_loader::DecodedAudio;
use crate::processor::sampler::Sampler;
use crate::processor::sound::{MidiNoteSet, SamplerSound};

pub mod adsr;
pub mod audio_stream;
pub mod channels;
pub mod constants;
pub mod errors;
pub mod file_chooser;
pub mod format_registry;
pub mod midi;
pub mod sample_loader;
pub mod sampler;
pub mod sound;
pub mod voice;

/// Title of the dialog opened by [`ProcessorHandle::load_file_interactive`].
const LOAD_DIALOG_TITLE: &str = "Please load a file...";

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Summary of a successfully loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSample {
    /// File name without its directory.
    pub name: String,
    /// Source frames handed to the sampler.
    pub frames: usize,
    /// Channels in the source file.
    pub channels: usize,
    /// Source sample rate in Hz.
    pub sample_rate: u32,
}

// =============================================================================
// UI side
// =============================================================================

/// UI-side half of the processor.
///
/// Cheap to clone; every clone talks to the same [`SamplerProcessor`].
#[derive(Clone)]
pub struct ProcessorHandle {
    registry: Arc<FormatRegistry>,
    file_chooser: Arc<Mutex<Box<dyn FileChooser>>>,
    shared_adsr: Arc<SharedAdsr>,
    adsr_params: Arc<Mutex<AdsrParams>>,
    waveform: Arc<Mutex<Arc<[f32]>>>,
    producer: Arc<Mutex<Producer<ControlMessage>>>,
    consumer: Arc<Mutex<Consumer<AudioMessage>>>,
}

impl ProcessorHandle {
    /// Asks the file chooser for a file and loads it.
    ///
    /// A cancelled dialog returns [`SampleLoadError::NoFileSelected`] and
    /// leaves the loaded sound untouched.
    pub fn load_file_interactive(&self) -> Result<LoadedSample, SampleLoadError> {
        let wildcard = self.registry.wildcard_for_all_formats();
        let chosen = lock(&self.file_chooser).browse_for_file_to_open(LOAD_DIALOG_TITLE, &wildcard);

        match chosen {
            Some(path) => self.load_file(&path),
            None => Err(SampleLoadError::NoFileSelected),
        }
    }

    /// Decodes `path` and replaces the loaded sound with it.
    ///
    /// On success the waveform cache holds the first channel of the whole
    /// file. On failure the previous sound and waveform stay as they were.
    pub fn load_file(&self, path: &Path) -> Result<LoadedSample, SampleLoadError> {
        let decoded = self.registry.create_reader_for(path)?;
        let sound = prepare_sound(&decoded)?;
        let frames = sound.data().length();
        let waveform = extract_channel(&decoded.samples, decoded.channels, 0);

        lock(&self.producer)
            .push(ControlMessage::ReplaceSound(sound))
            .map_err(|_| SampleLoadError::QueueFull)?;

        *lock(&self.waveform) = Arc::from(waveform);

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!(
            "Loaded {} ({} frames, {} ch @ {} Hz)",
            path.display(),
            decoded.frames(),
            decoded.channels,
            decoded.sample_rate
        );

        Ok(LoadedSample {
            name,
            frames,
            channels: decoded.channels,
            sample_rate: decoded.sample_rate,
        })
    }

    /// Replaces the dialog used by [`load_file_interactive`](Self::load_file_interactive).
    pub fn set_file_chooser(&self, chooser: impl FileChooser + 'static) {
        *lock(&self.file_chooser) = Box::new(chooser);
    }

    /// Current envelope settings as last edited.
    pub fn adsr_params(&self) -> AdsrParams {
        *lock(&self.adsr_params)
    }

    /// Mutable access to the envelope settings.
    ///
    /// Edits reach the audio thread once [`update_adsr`](Self::update_adsr)
    /// is called. Drop the guard first.
    pub fn adsr_params_mut(&self) -> MutexGuard<'_, AdsrParams> {
        lock(&self.adsr_params)
    }

    /// Clamps the envelope settings to their ranges and publishes them.
    ///
    /// The audio thread applies them to every loaded sound at the start of
    /// its next block.
    pub fn update_adsr(&self) {
        let params = {
            let mut params = lock(&self.adsr_params);
            *params = params.clamped();
            *params
        };

        self.shared_adsr.publish(params);
        log::debug!(
            "ADSR updated: attack {:.2}, decay {:.2}, sustain {:.2}, release {:.2}",
            params.attack,
            params.decay,
            params.sustain,
            params.release
        );
    }

    /// First channel of the most recently loaded file.
    pub fn waveform(&self) -> Arc<[f32]> {
        Arc::clone(&lock(&self.waveform))
    }

    pub fn note_on(&self, note: u8, velocity: f32) -> Result<(), ControlError> {
        self.send_midi(MidiEvent::note_on(0, note, velocity))
    }

    pub fn note_off(&self, note: u8) -> Result<(), ControlError> {
        self.send_midi(MidiEvent::note_off(0, note))
    }

    pub fn all_notes_off(&self) -> Result<(), ControlError> {
        self.send_midi(MidiEvent::new(0, MidiMessage::AllNotesOff { channel: 1 }))
    }

    fn send_midi(&self, event: MidiEvent) -> Result<(), ControlError> {
        lock(&self.producer)
            .push(ControlMessage::Midi(event))
            .map_err(|_| {
                log::warn!("Dropping {:?}: control queue full", event.message);
                ControlError::QueueFull
            })
    }

    /// Takes every pending message from the audio thread.
    ///
    /// Retired sounds are dropped by the caller, keeping deallocation off
    /// the audio thread.
    pub fn drain_events(&self) -> Vec<AudioMessage> {
        let mut consumer = lock(&self.consumer);
        let mut events = Vec::with_capacity(consumer.slots());
        while let Ok(message) = consumer.pop() {
            events.push(message);
        }
        events
    }
}

/// Builds the sound for a freshly decoded file: every note, root note 60,
/// the default envelope and at most ten seconds of audio.
fn prepare_sound(decoded: &DecodedAudio) -> Result<SamplerSound, SampleLoadError> {
    if decoded.is_empty() {
        return Err(SampleLoadError::EmptyFile);
    }

    Ok(SamplerSound::new(
        SOUND_NAME,
        decoded,
        MidiNoteSet::with_range(0, 128),
        ROOT_NOTE,
        DEFAULT_SOUND_ATTACK,
        DEFAULT_SOUND_RELEASE,
        MAX_SAMPLE_LENGTH_SECONDS,
    ))
}

// =============================================================================
// Audio side
// =============================================================================

/// The audio-thread half of the sampler plugin.
pub struct SamplerProcessor {
    sampler: Sampler,
    control_rx: Consumer<ControlMessage>,
    events_tx: Producer<AudioMessage>,
    shared_adsr: Arc<SharedAdsr>,
    adsr_generation: u64,
    /// MIDI from the UI, applied at the start of the next block.
    pending_midi: Vec<MidiEvent>,
    /// Replaced sounds not yet handed back to the UI thread.
    retiring: Vec<SamplerSound>,
    layout: BusesLayout,
    handle: ProcessorHandle,
}

impl SamplerProcessor {
    /// Creates a processor with 16 voices, no sound and no file dialog.
    pub fn new(registry: FormatRegistry) -> Self {
        Self::with_file_chooser(registry, NoFileChooser)
    }

    pub fn with_file_chooser(registry: FormatRegistry, chooser: impl FileChooser + 'static) -> Self {
        let (producer, control_rx) = RingBuffer::new(CONTROL_QUEUE_CAPACITY);
        let (events_tx, consumer) = RingBuffer::new(EVENT_QUEUE_CAPACITY);

        let params = AdsrParams::default();
        let shared_adsr = Arc::new(SharedAdsr::new(params));

        let handle = ProcessorHandle {
            registry: Arc::new(registry),
            file_chooser: Arc::new(Mutex::new(Box::new(chooser))),
            shared_adsr: Arc::clone(&shared_adsr),
            adsr_params: Arc::new(Mutex::new(params)),
            waveform: Arc::new(Mutex::new(Arc::from(Vec::new()))),
            producer: Arc::new(Mutex::new(producer)),
            consumer: Arc::new(Mutex::new(consumer)),
        };

        Self {
            sampler: Sampler::new(NUM_VOICES),
            control_rx,
            events_tx,
            adsr_generation: shared_adsr.generation(),
            shared_adsr,
            pending_midi: Vec::with_capacity(MAX_PENDING_MIDI),
            retiring: Vec::with_capacity(MAX_RETIRING_SOUNDS),
            layout: BusesLayout::default(),
            handle,
        }
    }

    pub fn handle(&self) -> ProcessorHandle {
        self.handle.clone()
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn buses_layout(&self) -> BusesLayout {
        self.layout
    }

    /// Applies `layout` if it is supported.
    pub fn set_buses_layout(&mut self, layout: BusesLayout) -> bool {
        if !self.is_buses_layout_supported(&layout) {
            return false;
        }
        self.layout = layout;
        true
    }

    /// Whether a replacement can retire the current sounds without growing
    /// the retiring list.
    fn has_room_to_retire(&self) -> bool {
        self.retiring.len() + self.sampler.num_sounds() <= MAX_RETIRING_SOUNDS
    }

    fn drain_control_messages(&mut self) {
        loop {
            // Leave replacements queued until the UI has collected old sounds.
            if matches!(self.control_rx.peek(), Ok(ControlMessage::ReplaceSound(_)))
                && !self.has_room_to_retire()
            {
                break;
            }

            let Ok(message) = self.control_rx.pop() else {
                break;
            };

            match message {
                ControlMessage::ReplaceSound(sound) => {
                    self.retiring.extend(self.sampler.take_sounds());

                    let frames = sound.data().length();
                    self.sampler.add_sound(sound);
                    let _ = self.events_tx.push(AudioMessage::SoundReplaced { frames });
                }
                ControlMessage::Midi(event) => {
                    if self.pending_midi.len() < MAX_PENDING_MIDI {
                        self.pending_midi.push(event);
                    }
                }
            }
        }
    }

    /// Sends retired sounds no voice reads from any more back to the UI
    /// thread, which frees them. The rest wait for a later block.
    fn hand_back_retired_sounds(&mut self) {
        let mut index = 0;
        while index < self.retiring.len() {
            if self.sampler.is_using(self.retiring[index].data()) {
                index += 1;
                continue;
            }

            let sound = self.retiring.swap_remove(index);
            if let Err(PushError::Full(message)) = self.events_tx.push(AudioMessage::SoundRetired(sound)) {
                if let AudioMessage::SoundRetired(sound) = message {
                    self.retiring.push(sound);
                }
                break;
            }
        }
    }

    fn apply_pending_adsr(&mut self) {
        if let Some(params) = self.shared_adsr.load_if_newer(&mut self.adsr_generation) {
            self.sampler.update_envelopes(params);
        }
    }
}

impl AudioPlugin for SamplerProcessor {
    type Editor = SamplerEditor;

    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn accepts_midi(&self) -> bool {
        true
    }

    fn produces_midi(&self) -> bool {
        false
    }

    fn prepare_to_play(&mut self, sample_rate: f64, samples_per_block: usize) {
        self.sampler.set_current_playback_sample_rate(sample_rate);

        self.adsr_generation = self.shared_adsr.generation();
        self.sampler.update_envelopes(self.shared_adsr.snapshot());

        log::info!("Prepared {PLUGIN_NAME} at {sample_rate} Hz, {samples_per_block} frames per block");
    }

    fn release_resources(&mut self) {
        self.sampler.all_notes_off(false);
        self.hand_back_retired_sounds();
    }

    fn is_buses_layout_supported(&self, layout: &BusesLayout) -> bool {
        layout.is_supported(true)
    }

    fn process_block(&mut self, buffer: &mut [&mut [f32]], midi: &[MidiEvent]) {
        self.drain_control_messages();
        self.apply_pending_adsr();

        let num_inputs = self.layout.main_input.channel_count();
        for channel in buffer.iter_mut().skip(num_inputs) {
            channel.fill(0.0);
        }

        for event in self.pending_midi.drain(..) {
            self.sampler.handle_midi_event(&event.message);
        }

        let num_samples = buffer.first().map_or(0, |channel| channel.len());
        self.sampler.render_next_block(buffer, midi, 0, num_samples);

        self.hand_back_retired_sounds();
    }

    fn has_editor(&self) -> bool {
        true
    }

    fn create_editor(&self) -> Option<SamplerEditor> {
        Some(SamplerEditor::new(self.handle()))
    }

    fn state_information(&self) -> Vec<u8> {
        Vec::new()
    }

    fn set_state_information(&mut self, _data: &[u8]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ChannelSet;
    use crate::processor::sound::EnvelopeTarget;
    use crate::test_util::write_test_wav;

    fn prepared_processor() -> SamplerProcessor {
        let mut processor = SamplerProcessor::new(FormatRegistry::with_basic_formats());
        processor.prepare_to_play(44_100.0, 512);
        processor
    }

    fn render(processor: &mut SamplerProcessor, frames: usize, midi: &[MidiEvent]) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        {
            let mut buffer: [&mut [f32]; 2] = [&mut left, &mut right];
            processor.process_block(&mut buffer, midi);
        }
        (left, right)
    }

    #[test]
    fn test_plugin_properties() {
        let processor = SamplerProcessor::new(FormatRegistry::default());
        assert_eq!(processor.name(), "BlueSampler");
        assert!(processor.accepts_midi());
        assert!(!processor.produces_midi());
        assert!(!processor.is_midi_effect());
        assert_eq!(processor.tail_length_seconds(), 0.0);
        assert_eq!(processor.num_programs(), 1);
        assert_eq!(processor.current_program(), 0);
        assert_eq!(processor.program_name(0), "");
        assert!(processor.has_editor());
        assert_eq!(processor.sampler().num_voices(), 16);
        assert_eq!(processor.sampler().num_sounds(), 0);
    }

    #[test]
    fn test_state_is_empty() {
        let mut processor = SamplerProcessor::new(FormatRegistry::default());
        assert!(processor.state_information().is_empty());
        processor.set_state_information(&[1, 2, 3]);
        assert!(processor.state_information().is_empty());
    }

    #[test]
    fn test_buses_layout() {
        let mut processor = SamplerProcessor::new(FormatRegistry::default());
        assert!(processor.set_buses_layout(BusesLayout::instrument(ChannelSet::Mono)));
        assert_eq!(processor.buses_layout().main_output, ChannelSet::Mono);
        assert!(!processor.set_buses_layout(BusesLayout::instrument(ChannelSet::Discrete(4))));
        assert_eq!(processor.buses_layout().main_output, ChannelSet::Mono);
    }

    #[test]
    fn test_process_block_clears_output_without_sound() {
        let mut processor = prepared_processor();
        let mut left = vec![0.7; 64];
        let mut right = vec![-0.3; 64];
        {
            let mut buffer: [&mut [f32]; 2] = [&mut left, &mut right];
            processor.process_block(&mut buffer, &[MidiEvent::note_on(0, 60, 1.0)]);
        }
        assert!(left.iter().chain(right.iter()).all(|s| *s == 0.0));
    }

    #[test]
    fn test_load_file_replaces_sound() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("kick.wav");
        write_test_wav(&path, 4_800).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();

        let loaded = handle.load_file(&path).unwrap();
        assert_eq!(loaded.name, "kick.wav");
        assert_eq!(loaded.frames, 4_800);
        assert_eq!(loaded.channels, 1);
        assert_eq!(loaded.sample_rate, 44_100);
        assert_eq!(handle.waveform().len(), 4_800);

        // Not applied until the audio thread runs.
        assert_eq!(processor.sampler().num_sounds(), 0);
        render(&mut processor, 32, &[]);

        let sound = processor.sampler().sound(0).unwrap();
        assert_eq!(processor.sampler().num_sounds(), 1);
        assert_eq!(sound.name(), "Sample");
        assert_eq!(sound.root_note(), 60);
        assert_eq!(sound.midi_notes(), MidiNoteSet::full());
        assert_eq!(sound.envelope().attack, 0.1);
        assert_eq!(sound.envelope().release, 0.1);

        let events = handle.drain_events();
        assert!(matches!(events.as_slice(), [AudioMessage::SoundReplaced { frames: 4_800 }]));
    }

    #[test]
    fn test_second_load_keeps_single_sound() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first.wav");
        let second = tmp.path().join("second.wav");
        write_test_wav(&first, 100).unwrap();
        write_test_wav(&second, 200).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();

        handle.load_file(&first).unwrap();
        handle.load_file(&second).unwrap();
        render(&mut processor, 32, &[]);

        assert_eq!(processor.sampler().num_sounds(), 1);
        assert_eq!(processor.sampler().sound(0).unwrap().data().length(), 200);
        assert_eq!(handle.waveform().len(), 200);

        let events = handle.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], AudioMessage::SoundReplaced { frames: 100 }));
        assert!(matches!(events[1], AudioMessage::SoundReplaced { frames: 200 }));
        assert!(matches!(events[2], AudioMessage::SoundRetired(_)));
    }

    #[test]
    fn test_replaced_sound_outlives_sounding_voice() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first.wav");
        let second = tmp.path().join("second.wav");
        write_test_wav(&first, 44_100).unwrap();
        write_test_wav(&second, 100).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();
        handle.load_file(&first).unwrap();
        render(&mut processor, 32, &[MidiEvent::note_on(0, 60, 1.0)]);
        assert_eq!(processor.sampler().active_voice_count(), 1);

        handle.load_file(&second).unwrap();
        render(&mut processor, 32, &[]);

        // The voice keeps playing the old audio, but the audio thread still
        // holds the retired sound, so the voice is never its last owner.
        let voice = processor.sampler().voices().iter().find(|v| v.is_active()).unwrap();
        assert!(Arc::strong_count(voice.sound_data().unwrap()) > 1);
        assert!(handle
            .drain_events()
            .iter()
            .all(|event| !matches!(event, AudioMessage::SoundRetired(_))));

        processor.release_resources();
        let retired: Vec<SamplerSound> = handle
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                AudioMessage::SoundRetired(sound) => Some(sound),
                AudioMessage::SoundReplaced { .. } => None,
            })
            .collect();

        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].data().length(), 44_100);
        assert_eq!(Arc::strong_count(retired[0].data()), 1);
    }

    #[test]
    fn test_retired_sounds_survive_full_event_queue() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("loop.wav");
        write_test_wav(&path, 64).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();
        let loads = 40;
        for _ in 0..loads {
            handle.load_file(&path).unwrap();
        }

        // Nobody collects events for a while.
        for _ in 0..5 {
            render(&mut processor, 32, &[]);
        }

        let mut retired = 0;
        for _ in 0..10 {
            retired += handle
                .drain_events()
                .iter()
                .filter(|event| matches!(event, AudioMessage::SoundRetired(_)))
                .count();
            render(&mut processor, 32, &[]);
        }

        assert_eq!(retired, loads - 1);
        assert_eq!(processor.sampler().num_sounds(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_sound() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("good.wav");
        let bad = tmp.path().join("notes.txt");
        write_test_wav(&good, 100).unwrap();
        std::fs::write(&bad, b"not audio").unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();
        handle.load_file(&good).unwrap();
        render(&mut processor, 32, &[]);

        let err = handle.load_file(&bad).unwrap_err();
        assert!(matches!(err, SampleLoadError::UnsupportedFormat { .. }));

        let err = handle.load_file(&tmp.path().join("missing.wav")).unwrap_err();
        assert!(matches!(err, SampleLoadError::Io(_)));

        render(&mut processor, 32, &[]);
        assert_eq!(processor.sampler().num_sounds(), 1);
        assert_eq!(handle.waveform().len(), 100);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let decoded = DecodedAudio {
            channels: 1,
            sample_rate: 44_100,
            samples: Vec::new(),
        };
        assert!(matches!(prepare_sound(&decoded), Err(SampleLoadError::EmptyFile)));
    }

    #[test]
    fn test_cancelled_dialog_changes_nothing() {
        let mut processor = prepared_processor();
        let handle = processor.handle();

        let err = handle.load_file_interactive().unwrap_err();
        assert!(matches!(err, SampleLoadError::NoFileSelected));

        render(&mut processor, 32, &[]);
        assert_eq!(processor.sampler().num_sounds(), 0);
        assert!(handle.waveform().is_empty());
        assert!(handle.drain_events().is_empty());
    }

    #[test]
    fn test_interactive_load_uses_chooser() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snare.wav");
        write_test_wav(&path, 300).unwrap();

        let seen = Arc::new(Mutex::new(None));
        let seen_in_chooser = Arc::clone(&seen);
        let chosen = path.clone();

        let processor = SamplerProcessor::with_file_chooser(
            FormatRegistry::with_basic_formats(),
            move |title: &str, wildcard: &str| {
                *seen_in_chooser.lock().unwrap() = Some((title.to_string(), wildcard.to_string()));
                Some(chosen.clone())
            },
        );

        let loaded = processor.handle().load_file_interactive().unwrap();
        assert_eq!(loaded.name, "snare.wav");

        let (title, wildcard) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(title, "Please load a file...");
        assert!(wildcard.contains("*.wav"));
        assert!(wildcard.contains("*.mp3"));
    }

    #[test]
    fn test_update_adsr_reaches_loaded_sound() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pad.wav");
        write_test_wav(&path, 100).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();
        handle.load_file(&path).unwrap();
        render(&mut processor, 16, &[]);

        {
            let mut params = handle.adsr_params_mut();
            params.attack = 2.0;
            params.decay = 0.5;
            params.sustain = 0.25;
            params.release = 9.0;
        }
        handle.update_adsr();

        // Clamped on the UI side too.
        assert_eq!(handle.adsr_params().release, 1.0);

        // Nothing changes until the next block.
        assert_eq!(processor.sampler().sound(0).unwrap().envelope().attack, 0.1);
        render(&mut processor, 16, &[]);

        let envelope = processor.sampler().sound(0).unwrap().envelope();
        assert_eq!(envelope, AdsrParams::new(2.0, 0.5, 0.25, 1.0));
    }

    #[test]
    fn test_handle_notes_play_on_next_block() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tone.wav");
        write_test_wav(&path, 4_410).unwrap();

        let mut processor = prepared_processor();
        let handle = processor.handle();
        handle.load_file(&path).unwrap();
        render(&mut processor, 16, &[]);

        handle.note_on(60, 1.0).unwrap();
        let (left, right) = render(&mut processor, 64, &[]);
        assert!(left.iter().any(|s| *s > 0.0));
        assert_eq!(left, right);
        assert_eq!(processor.sampler().active_voice_count(), 1);

        handle.all_notes_off().unwrap();
        render(&mut processor, 16, &[]);
        assert!(processor.sampler().voices().iter().all(|voice| !voice.is_key_down()));
    }

    #[test]
    fn test_host_midi_is_sample_accurate() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tone.wav");
        write_test_wav(&path, 4_410).unwrap();

        let mut processor = prepared_processor();
        processor.handle().load_file(&path).unwrap();
        render(&mut processor, 16, &[]);

        let (left, _) = render(&mut processor, 64, &[MidiEvent::note_on(32, 60, 1.0)]);
        assert!(left[..32].iter().all(|s| *s == 0.0));
        assert!(left[32..].iter().any(|s| *s > 0.0));
    }

    #[test]
    fn test_release_resources_silences_voices() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tone.wav");
        write_test_wav(&path, 4_410).unwrap();

        let mut processor = prepared_processor();
        processor.handle().load_file(&path).unwrap();
        render(&mut processor, 16, &[MidiEvent::note_on(0, 64, 1.0)]);
        assert_eq!(processor.sampler().active_voice_count(), 1);

        processor.release_resources();
        assert_eq!(processor.sampler().active_voice_count(), 0);
    }
}
