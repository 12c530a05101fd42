/// Splits interleaved samples into planar channel buffers.
///
/// Keeps at most `max_channels` channels and `max_frames` frames. Extra
/// channels of the source are dropped, never mixed down.
///
/// # Parameters
///
/// - `samples`: Interleaved audio samples
/// - `file_channels`: Number of channels in `samples`
/// - `max_channels`: Upper bound on the number of returned channels
/// - `max_frames`: Upper bound on the length of each returned channel
pub fn deinterleave(
    samples: &[f32],
    file_channels: usize,
    max_channels: usize,
    max_frames: usize,
) -> Vec<Vec<f32>> {
    if file_channels == 0 {
        return Vec::new();
    }

    let frames = (samples.len() / file_channels).min(max_frames);
    let channels = file_channels.min(max_channels);

    (0..channels)
        .map(|channel| {
            samples
                .chunks_exact(file_channels)
                .take(frames)
                .map(|frame| frame[channel])
                .collect()
        })
        .collect()
}

/// Extracts a single channel from interleaved samples.
pub fn extract_channel(samples: &[f32], file_channels: usize, channel: usize) -> Vec<f32> {
    if channel >= file_channels {
        return Vec::new();
    }

    samples
        .chunks_exact(file_channels)
        .map(|frame| frame[channel])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_stereo() {
        let input = [0.5, 0.3, -0.2, 0.4, 0.8, 0.6];
        let output = deinterleave(&input, 2, 2, usize::MAX);

        assert_eq!(output.len(), 2);
        assert_eq!(output[0], vec![0.5, -0.2, 0.8]);
        assert_eq!(output[1], vec![0.3, 0.4, 0.6]);
    }

    #[test]
    fn test_deinterleave_mono() {
        let input = [0.5, -0.3, 0.8];
        let output = deinterleave(&input, 1, 2, usize::MAX);

        assert_eq!(output, vec![vec![0.5, -0.3, 0.8]]);
    }

    #[test]
    fn test_deinterleave_drops_extra_channels() {
        let input = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let output = deinterleave(&input, 4, 2, usize::MAX);

        assert_eq!(output.len(), 2);
        assert_eq!(output[0], vec![0.1, 0.5]);
        assert_eq!(output[1], vec![0.2, 0.6]);
    }

    #[test]
    fn test_deinterleave_truncates_frames() {
        let input = [0.1, 0.2, 0.3, 0.4, 0.5];
        let output = deinterleave(&input, 1, 2, 3);

        assert_eq!(output, vec![vec![0.1, 0.2, 0.3]]);
    }

    #[test]
    fn test_deinterleave_no_channels() {
        assert!(deinterleave(&[0.1, 0.2], 0, 2, usize::MAX).is_empty());
    }

    #[test]
    fn test_extract_channel() {
        let input = [0.5, 0.3, -0.2, 0.4];
        assert_eq!(extract_channel(&input, 2, 0), vec![0.5, -0.2]);
        assert_eq!(extract_channel(&input, 2, 1), vec![0.3, 0.4]);
        assert!(extract_channel(&input, 2, 2).is_empty());
    }
}
