//! Waveform decimation and tracing.

use crate::editor::graphics::Path;

/// Linear remap of `value` from `[source_min, source_max]` to
/// `[target_min, target_max]`. Not clamped.
pub fn jmap(value: f32, source_min: f32, source_max: f32, target_min: f32, target_max: f32) -> f32 {
    target_min + (value - source_min) * (target_max - target_min) / (source_max - source_min)
}

/// Number of samples skipped between two drawn points. Never zero.
pub fn decimation_stride(num_samples: usize, width: usize) -> usize {
    if width == 0 {
        return num_samples.max(1);
    }
    (num_samples / width).max(1)
}

/// Picks one sample per horizontal pixel.
///
/// Returns at most `width` points; fewer when the buffer is shorter than the
/// window.
pub fn decimate(samples: &[f32], width: usize) -> Vec<f32> {
    let stride = decimation_stride(samples.len(), width);
    samples.iter().step_by(stride).take(width).copied().collect()
}

/// Traces decimated points across a window `height` pixels tall.
///
/// The path starts at the vertical centre of the left edge. Point `i` sits
/// at x = `i`, with amplitude -1 at the bottom and 1 at the top.
pub fn waveform_path(points: &[f32], height: f32) -> Path {
    let mut path = Path::with_capacity(points.len() + 1);
    path.start_new_sub_path(0.0, height / 2.0);

    for (i, &sample) in points.iter().enumerate() {
        path.line_to(i as f32, jmap(sample, -1.0, 1.0, height, 0.0));
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jmap_inverts_amplitude() {
        assert_eq!(jmap(-1.0, -1.0, 1.0, 200.0, 0.0), 200.0);
        assert_eq!(jmap(1.0, -1.0, 1.0, 200.0, 0.0), 0.0);
        assert_eq!(jmap(0.0, -1.0, 1.0, 200.0, 0.0), 100.0);
    }

    #[test]
    fn test_stride_never_zero() {
        assert_eq!(decimation_stride(4_800, 600), 8);
        assert_eq!(decimation_stride(100, 600), 1);
        assert_eq!(decimation_stride(0, 600), 1);
        assert_eq!(decimation_stride(100, 0), 100);
    }

    #[test]
    fn test_decimate_short_buffer() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(decimate(&samples, 600), vec![0.1, 0.2, 0.3]);
        assert!(decimate(&[], 600).is_empty());
        assert!(decimate(&samples, 0).is_empty());
    }

    #[test]
    fn test_decimate_never_exceeds_width() {
        for len in [599, 600, 601, 1_199, 1_200, 4_801, 10_007] {
            let samples = vec![0.0; len];
            let points = decimate(&samples, 600);
            assert!(points.len() <= 600, "{len} samples gave {} points", points.len());
        }
    }

    #[test]
    fn test_decimate_picks_every_stride_sample() {
        let samples: Vec<f32> = (0..4_800).map(|i| i as f32).collect();
        let points = decimate(&samples, 600);

        assert_eq!(points.len(), 600);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[1], 8.0);
        assert_eq!(points[599], 4_792.0);
    }

    #[test]
    fn test_waveform_path_shape() {
        let path = waveform_path(&[0.0, 1.0, -1.0], 200.0);

        assert_eq!(path.num_segments(), 3);
        assert_eq!(path.elements()[0].point(), (0.0, 100.0));
        assert_eq!(path.elements()[1].point(), (0.0, 100.0));
        assert_eq!(path.elements()[2].point(), (1.0, 0.0));
        assert_eq!(path.elements()[3].point(), (2.0, 200.0));
    }

    #[test]
    fn test_tracing_is_repeatable() {
        let samples: Vec<f32> = (0..4_800).map(|i| (i as f32 * 0.01).sin()).collect();
        let first = waveform_path(&decimate(&samples, 600), 200.0);
        let second = waveform_path(&decimate(&samples, 600), 200.0);
        assert_eq!(first, second);
    }
}
