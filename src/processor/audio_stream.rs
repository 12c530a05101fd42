//! Audio Stream Module
//!
//! This module runs a [`SamplerProcessor`] without a plugin host:
//! - Stream initialization and configuration
//! - Driving the processor from the CPAL callback
//! - Error handling for audio stream operations

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use env_logger::{Builder, Env};

use crate::plugin::{AudioPlugin, BusesLayout, ChannelSet};
use crate::processor::SamplerProcessor;

/// Frames requested per callback.
const STREAM_BUFFER_FRAMES: usize = 512;

/// Handle to a running audio stream
pub struct AudioStreamHandle {
    pub stream: Stream,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Setup and configure the logger for audio operations
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=debug` to see ADSR updates.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

/// Planar scratch buffers the processor renders into before interleaving.
struct BlockRenderer {
    left: Vec<f32>,
    right: Vec<f32>,
    render_channels: usize,
}

impl BlockRenderer {
    fn new(device_channels: usize, max_frames: usize) -> Self {
        Self {
            left: vec![0.0; max_frames],
            right: vec![0.0; max_frames],
            render_channels: device_channels.min(2),
        }
    }

    /// Layout the processor is asked to render.
    fn layout(&self) -> BusesLayout {
        BusesLayout::instrument(ChannelSet::from_channel_count(self.render_channels))
    }

    /// Fills an interleaved device buffer. Device channels past the second
    /// are silenced.
    fn render(&mut self, processor: &mut SamplerProcessor, data: &mut [f32], device_channels: usize) {
        if device_channels == 0 {
            return;
        }

        let max_frames = self.left.len();
        for chunk in data.chunks_mut(max_frames * device_channels) {
            let frames = chunk.len() / device_channels;
            let left = &mut self.left[..frames];
            let right = &mut self.right[..frames];

            if self.render_channels == 1 {
                let mut buffer: [&mut [f32]; 1] = [left];
                processor.process_block(&mut buffer, &[]);
            } else {
                let mut buffer: [&mut [f32]; 2] = [left, right];
                processor.process_block(&mut buffer, &[]);
            }

            for (frame, out) in chunk.chunks_exact_mut(device_channels).enumerate() {
                out.fill(0.0);
                out[0] = self.left[frame];
                if self.render_channels > 1 {
                    out[1] = self.right[frame];
                }
            }
        }
    }
}

/// Create and configure the audio stream
///
/// This function:
/// 1. Sets up the default audio device
/// 2. Prepares the processor at the device sample rate
/// 3. Builds the stream that drives [`SamplerProcessor::process_block`]
///
/// The processor moves into the audio callback. Keep a
/// [`ProcessorHandle`](crate::processor::ProcessorHandle) to talk to it.
pub fn create_audio_stream(
    mut processor: SamplerProcessor,
) -> Result<AudioStreamHandle, Box<dyn std::error::Error>> {
    setup_logger();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No audio device found")?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!(
        "Starting {}... ({} ch@{} Hz)",
        processor.name(),
        channels,
        sample_rate
    );

    let device_channels = channels as usize;
    let mut renderer = BlockRenderer::new(device_channels, STREAM_BUFFER_FRAMES);
    if !processor.set_buses_layout(renderer.layout()) {
        return Err(format!("Unsupported output channel count: {channels}").into());
    }
    processor.prepare_to_play(f64::from(sample_rate), STREAM_BUFFER_FRAMES);

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(STREAM_BUFFER_FRAMES as u32),
    };

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            renderer.render(&mut processor, data, device_channels);
        },
        |err| {
            log::error!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(AudioStreamHandle {
        stream,
        output_channels: device_channels,
        output_sample_rate: sample_rate,
    })
}

/// Start playing the audio stream
pub fn start_stream(stream: &Stream) -> Result<(), Box<dyn std::error::Error>> {
    stream.play()?;
    Ok(())
}
