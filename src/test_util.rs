//! Fixtures shared by the unit tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a 16-bit PCM WAV file with interleaved `samples`.
pub fn write_pcm16_wav(
    path: &Path,
    channels: u16,
    sample_rate_hz: u32,
    samples: &[i16],
) -> std::io::Result<()> {
    let bits_per_sample = 16u16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate_hz * u32::from(block_align);
    let data_len_bytes = u32::try_from(samples.len() * 2).expect("sample data too large");
    let chunk_size = 36 + data_len_bytes;

    let mut file = File::create(path)?;
    file.write_all(b"RIFF")?;
    file.write_all(&chunk_size.to_le_bytes())?;
    file.write_all(b"WAVE")?;

    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&channels.to_le_bytes())?;
    file.write_all(&sample_rate_hz.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&block_align.to_le_bytes())?;
    file.write_all(&bits_per_sample.to_le_bytes())?;

    file.write_all(b"data")?;
    file.write_all(&data_len_bytes.to_le_bytes())?;
    for sample in samples {
        file.write_all(&sample.to_le_bytes())?;
    }

    Ok(())
}

/// A short mono ramp, loud enough to be audible after the envelope.
pub fn write_test_wav(path: &Path, frames: usize) -> std::io::Result<()> {
    let samples: Vec<i16> = (0..frames)
        .map(|i| if i % 2 == 0 { 16_384 } else { 8_192 })
        .collect();
    write_pcm16_wav(path, 1, 44_100, &samples)
}
