//! Python front end for the sampler.
//!
//! [`SamplerPlugin`] bundles a [`SamplerProcessor`] with its editor model so a
//! Python UI can host the sampler standalone: the processor runs on a CPAL
//! stream while the UI forwards clicks, drops, knob moves and paint requests.

use std::path::PathBuf;
use std::sync::Mutex;

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::editor::SamplerEditor;
use crate::editor::graphics::{PathRecorder, PathElement};
use crate::editor::widgets::SliderId;
use crate::plugin::AudioPlugin;
use crate::processor::audio_stream::{AudioStreamHandle, create_audio_stream, setup_logger, start_stream};
use crate::processor::file_chooser::FileChooser;
use crate::processor::format_registry::FormatRegistry;
use crate::processor::{ProcessorHandle, SamplerProcessor};

/// Calls a Python callable `(title, wildcard) -> str | os.PathLike | None`.
struct PyFileChooser {
    callback: Py<PyAny>,
}

impl FileChooser for PyFileChooser {
    fn browse_for_file_to_open(&mut self, title: &str, wildcard: &str) -> Option<PathBuf> {
        Python::attach(|py| {
            let chosen = self
                .callback
                .call1(py, (title, wildcard))
                .and_then(|chosen| chosen.bind(py).extract::<Option<PathBuf>>().map_err(Into::into));

            match chosen {
                Ok(path) => path,
                Err(err) => {
                    log::warn!("File chooser callback failed: {err}");
                    None
                }
            }
        })
    }
}

fn parse_slider(name: &str) -> PyResult<SliderId> {
    SliderId::from_name(name).ok_or_else(|| {
        PyValueError::new_err(format!(
            "unknown slider '{name}' (expected attack, decay, sustain or release)"
        ))
    })
}

/// y coordinates of the `line_to` points of the last stroked path.
fn stroked_y_values(recorder: &PathRecorder) -> Vec<f32> {
    recorder
        .last_stroked_path()
        .map(|path| {
            path.elements()
                .iter()
                .filter_map(|element| match element {
                    PathElement::LineTo { y, .. } => Some(*y),
                    PathElement::StartNewSubPath { .. } => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Standalone sampler: processor, editor model and audio stream.
#[pyclass]
pub struct SamplerPlugin {
    /// Moves into the audio stream on [`run`](SamplerPlugin::run).
    processor: Mutex<Option<SamplerProcessor>>,
    handle: ProcessorHandle,
    editor: SamplerEditor,
    stream_handle: Option<AudioStreamHandle>,
}

#[pymethods]
impl SamplerPlugin {
    /// Create a sampler with no sound loaded.
    #[new]
    pub fn new() -> PyResult<Self> {
        setup_logger();

        let processor = SamplerProcessor::new(FormatRegistry::with_basic_formats());
        let editor = processor
            .create_editor()
            .ok_or_else(|| PyRuntimeError::new_err("Processor has no editor"))?;

        Ok(SamplerPlugin {
            handle: processor.handle(),
            processor: Mutex::new(Some(processor)),
            editor,
            stream_handle: None,
        })
    }

    /// Open the default output device and start playback.
    pub fn run(&mut self) -> PyResult<()> {
        if self.stream_handle.is_some() {
            return Err(PyRuntimeError::new_err("SamplerPlugin already running"));
        }

        let processor = self
            .processor
            .get_mut()
            .map_err(|_| PyRuntimeError::new_err("Failed to acquire processor lock"))?
            .take()
            .ok_or_else(|| PyRuntimeError::new_err("SamplerPlugin cannot be restarted"))?;

        match create_audio_stream(processor) {
            Ok(handle) => {
                start_stream(&handle.stream).map_err(|e| {
                    PyRuntimeError::new_err(format!("Failed to start audio stream: {e}"))
                })?;
                self.stream_handle = Some(handle);
                Ok(())
            }
            Err(e) => Err(PyRuntimeError::new_err(format!(
                "Failed to create audio stream: {e}"
            ))),
        }
    }

    /// Stop playback and close the stream.
    pub fn shut_down(&mut self) -> PyResult<()> {
        self.stream_handle = None;
        Ok(())
    }

    /// Load an audio file, replacing the current sound.
    ///
    /// Returns the file name.
    pub fn load_file(&mut self, path: PathBuf) -> PyResult<String> {
        self.editor
            .load_file(&path)
            .map(|loaded| loaded.name)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Install `callback(title, wildcard)` as the file dialog for the load button.
    pub fn set_file_chooser(&self, callback: Py<PyAny>) {
        self.handle.set_file_chooser(PyFileChooser { callback });
    }

    /// Press the load button.
    pub fn button_clicked(&mut self) {
        self.editor.button_clicked();
    }

    /// Forward a mouse click in window coordinates. Returns true if it
    /// pressed the load button.
    pub fn mouse_down(&mut self, x: f32, y: f32) -> bool {
        self.editor.mouse_down(x, y)
    }

    pub fn is_interested_in_file_drag(&self, files: Vec<String>) -> bool {
        self.editor.is_interested_in_file_drag(&files)
    }

    #[pyo3(signature = (files, x=0, y=0))]
    pub fn files_dropped(&mut self, files: Vec<String>, x: i32, y: i32) {
        self.editor.files_dropped(&files, x, y);
    }

    /// Move one of the envelope knobs.
    pub fn set_slider_value(&mut self, name: &str, value: f64) -> PyResult<()> {
        let id = parse_slider(name)?;
        self.editor.set_slider_value(id, value);
        Ok(())
    }

    pub fn slider_value(&self, name: &str) -> PyResult<f64> {
        let id = parse_slider(name)?;
        Ok(self.editor.slider(id).value())
    }

    /// Paint the editor.
    ///
    /// Returns the y coordinate of each waveform point, one per pixel column,
    /// or an empty array when nothing new needs drawing.
    pub fn paint<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let mut recorder = PathRecorder::new();
        self.editor.paint(&mut recorder);
        stroked_y_values(&recorder).into_pyarray(py)
    }

    /// Status line text, if a load has happened.
    pub fn status(&self) -> Option<String> {
        self.editor.status_text().map(str::to_owned)
    }

    #[pyo3(signature = (note, velocity=1.0))]
    pub fn note_on(&self, note: u8, velocity: f32) -> PyResult<()> {
        if !velocity.is_finite() || !(0.0..=1.0).contains(&velocity) {
            return Err(PyValueError::new_err("velocity out of range"));
        }

        self.handle
            .note_on(note, velocity)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn note_off(&self, note: u8) -> PyResult<()> {
        self.handle
            .note_off(note)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    pub fn all_notes_off(&self) -> PyResult<()> {
        self.handle
            .all_notes_off()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Call periodically from the UI loop.
    pub fn tick(&mut self) {
        self.editor.timer_callback();
    }
}
