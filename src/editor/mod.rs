//! Sampler Editor Module
//!
//! A toolkit-independent model of the plugin window:
//!
//! - [`widgets`]: Bounds, rotary sliders, captions and buttons
//! - [`waveform`]: Waveform decimation and tracing
//! - [`graphics`]: The drawing surface the editor paints onto
//!
//! [`SamplerEditor`] owns the widget state, turns user input into calls on
//! the [`ProcessorHandle`] and paints the waveform of the loaded file.

use std::path::Path;

use crate::editor::graphics::{Colour, Graphics};
use crate::editor::waveform::{decimate, waveform_path};
use crate::editor::widgets::{Rect, RotarySlider, SliderId, TextButton};
use crate::messages::AudioMessage;
use crate::processor::constants::{EDITOR_HEIGHT, EDITOR_WIDTH, WAVEFORM_STROKE_THICKNESS};
use crate::processor::errors::SampleLoadError;
use crate::processor::{LoadedSample, ProcessorHandle};

pub mod graphics;
pub mod waveform;
pub mod widgets;

/// Substrings a dropped file name must contain to be accepted.
const DRAG_ACCEPTED_SUBSTRINGS: [&str; 3] = [".wav", ".mp3", ".aif"];

/// Relative bounds of the first knob; the others follow to its right.
const SLIDER_START_X: f32 = 0.6;
const SLIDER_START_Y: f32 = 0.6;
const SLIDER_WIDTH: f32 = 0.1;
const SLIDER_HEIGHT: f32 = 0.4;

/// Relative bounds of the load button.
const LOAD_BUTTON_BOUNDS: (f32, f32, f32, f32) = (0.6, 0.15, 0.4, 0.3);

/// Whether any of `files` looks like an audio file the editor takes.
///
/// This is a plain substring test, so `a.wav.txt` is accepted too.
pub fn is_interested_in_file_drag<S: AsRef<str>>(files: &[S]) -> bool {
    files.iter().any(|file| is_accepted_file(file.as_ref()))
}

fn is_accepted_file(file: &str) -> bool {
    DRAG_ACCEPTED_SUBSTRINGS
        .iter()
        .any(|substring| file.contains(substring))
}

/// The plugin window.
pub struct SamplerEditor {
    handle: ProcessorHandle,
    width: f32,
    height: f32,
    load_button: TextButton,
    sliders: [RotarySlider; 4],
    /// Set when a new waveform needs drawing; cleared by the next paint.
    should_be_painting: bool,
    status: Option<String>,
}

impl SamplerEditor {
    /// Builds the editor at 600 x 200 with knobs showing the current envelope.
    pub fn new(handle: ProcessorHandle) -> Self {
        let params = handle.adsr_params();
        let mut sliders = SliderId::ALL.map(RotarySlider::for_envelope);
        sliders[SliderId::Attack.index()].set_value(f64::from(params.attack));
        sliders[SliderId::Decay.index()].set_value(f64::from(params.decay));
        sliders[SliderId::Sustain.index()].set_value(f64::from(params.sustain));
        sliders[SliderId::Release.index()].set_value(f64::from(params.release));

        let mut editor = Self {
            handle,
            width: 0.0,
            height: 0.0,
            load_button: TextButton::new("Load"),
            sliders,
            should_be_painting: false,
            status: None,
        };
        editor.set_size(EDITOR_WIDTH, EDITOR_HEIGHT);
        editor
    }

    pub fn is_resizable(&self) -> bool {
        false
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.resized();
    }

    /// Lays out the knobs in a row along the bottom right.
    pub fn resized(&mut self) {
        for (i, slider) in self.sliders.iter_mut().enumerate() {
            let x = SLIDER_START_X + SLIDER_WIDTH * i as f32;
            slider.set_bounds(Rect::relative(
                self.width,
                self.height,
                x,
                SLIDER_START_Y,
                SLIDER_WIDTH,
                SLIDER_HEIGHT,
            ));
        }

        let (x, y, width, height) = LOAD_BUTTON_BOUNDS;
        self.load_button.bounds = Rect::relative(self.width, self.height, x, y, width, height);
    }

    pub fn slider(&self, id: SliderId) -> &RotarySlider {
        &self.sliders[id.index()]
    }

    pub fn load_button(&self) -> &TextButton {
        &self.load_button
    }

    pub fn should_be_painting(&self) -> bool {
        self.should_be_painting
    }

    /// Message about the last load, if any.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Fills the window black and, when a new file was loaded, traces its
    /// waveform in white.
    pub fn paint<G: Graphics + ?Sized>(&mut self, g: &mut G) {
        g.fill_all(Colour::BLACK);
        g.set_colour(Colour::WHITE);

        if self.should_be_painting {
            let waveform = self.handle.waveform();
            let points = decimate(&waveform, self.width.max(0.0) as usize);
            let path = waveform_path(&points, self.height);
            g.stroke_path(&path, WAVEFORM_STROKE_THICKNESS);

            self.should_be_painting = false;
        }
    }

    /// Runs the interactive load.
    pub fn button_clicked(&mut self) {
        let result = self.handle.load_file_interactive();
        self.note_load_result(&result);
    }

    /// A click at window coordinates `(x, y)`. Returns true if it hit the
    /// load button.
    pub fn mouse_down(&mut self, x: f32, y: f32) -> bool {
        if !self.load_button.hit_test(x, y) {
            return false;
        }
        self.button_clicked();
        true
    }

    /// Loads `path` and schedules a waveform repaint.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadedSample, SampleLoadError> {
        let result = self.handle.load_file(path);
        self.note_load_result(&result);
        result
    }

    /// Loads every accepted file in `files`, in order.
    pub fn files_dropped<S: AsRef<str>>(&mut self, files: &[S], _x: i32, _y: i32) {
        for file in files.iter().map(AsRef::as_ref) {
            if is_accepted_file(file) {
                let _ = self.load_file(Path::new(file));
            }
        }
    }

    pub fn is_interested_in_file_drag<S: AsRef<str>>(&self, files: &[S]) -> bool {
        is_interested_in_file_drag(files)
    }

    fn note_load_result(&mut self, result: &Result<LoadedSample, SampleLoadError>) {
        match result {
            Ok(loaded) => {
                self.should_be_painting = true;
                self.status = Some(format!("Loaded {}", loaded.name));
            }
            Err(SampleLoadError::NoFileSelected) => {}
            Err(err) => {
                log::warn!("Failed to load sample: {err}");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Moves a knob as if dragged by the user. Notifies only on change.
    pub fn set_slider_value(&mut self, id: SliderId, value: f64) {
        if self.sliders[id.index()].set_value(value) {
            self.slider_value_changed(id);
        }
    }

    /// Writes the knob's value into the envelope and publishes it.
    pub fn slider_value_changed(&mut self, id: SliderId) {
        let value = self.sliders[id.index()].value() as f32;
        {
            let mut params = self.handle.adsr_params_mut();
            match id {
                SliderId::Attack => params.attack = value,
                SliderId::Decay => params.decay = value,
                SliderId::Sustain => params.sustain = value,
                SliderId::Release => params.release = value,
            }
        }
        self.handle.update_adsr();
    }

    /// Periodic housekeeping on the UI thread. Releases sounds the audio
    /// thread has retired.
    pub fn timer_callback(&mut self) {
        for event in self.handle.drain_events() {
            match event {
                AudioMessage::SoundReplaced { frames } => {
                    log::debug!("Audio thread switched to new sound ({frames} frames)");
                }
                AudioMessage::SoundRetired(sound) => drop(sound),
            }
        }
    }
}
