//! Attack/decay/sustain/release envelope.
//!
//! [`AdsrParams`] is the plain parameter struct the editor edits, [`Adsr`] is
//! the per-voice envelope generator and [`SharedAdsr`] is the lock-free
//! snapshot the UI thread publishes and the audio thread picks up once per
//! block.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::processor::constants::{
    ATTACK_MAX, ATTACK_MIN, DECAY_MAX, DECAY_MIN, RELEASE_MAX, RELEASE_MIN, SUSTAIN_MAX,
    SUSTAIN_MIN,
};

/// Envelope timing. Attack, decay and release are in seconds, sustain is a
/// level between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.1,
        }
    }
}

fn clamp_field(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

impl AdsrParams {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Returns a copy with every field forced into its editable range.
    ///
    /// Non-finite values collapse to the lower bound.
    pub fn clamped(self) -> Self {
        Self {
            attack: clamp_field(self.attack, ATTACK_MIN, ATTACK_MAX),
            decay: clamp_field(self.decay, DECAY_MIN, DECAY_MAX),
            sustain: clamp_field(self.sustain, SUSTAIN_MIN, SUSTAIN_MAX),
            release: clamp_field(self.release, RELEASE_MIN, RELEASE_MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeStage {
    #[default]
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Per-sample rate for covering `distance` in `seconds`, or a negative value
/// when the stage has no length and must be skipped.
fn rate(distance: f32, seconds: f32, sample_rate: f64) -> f32 {
    if seconds > 0.0 && sample_rate > 0.0 {
        (f64::from(distance) / (f64::from(seconds) * sample_rate)) as f32
    } else {
        -1.0
    }
}

/// Linear ADSR envelope generator.
#[derive(Debug, Clone)]
pub struct Adsr {
    params: AdsrParams,
    sample_rate: f64,
    stage: EnvelopeStage,
    level: f32,
    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new()
    }
}

impl Adsr {
    pub fn new() -> Self {
        let mut adsr = Self {
            params: AdsrParams::default(),
            sample_rate: 44_100.0,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
        };
        adsr.recalculate_rates();
        adsr
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate_rates();
    }

    pub fn set_parameters(&mut self, params: AdsrParams) {
        self.params = params.clamped();
        self.recalculate_rates();
    }

    pub fn parameters(&self) -> AdsrParams {
        self.params
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    pub fn note_on(&mut self) {
        if self.attack_rate > 0.0 {
            self.stage = EnvelopeStage::Attack;
        } else if self.decay_rate > 0.0 {
            self.level = 1.0;
            self.stage = EnvelopeStage::Decay;
        } else {
            self.level = self.params.sustain;
            self.stage = EnvelopeStage::Sustain;
        }
    }

    /// Enters the release stage from the current level.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }

        if self.params.release > 0.0 {
            self.release_rate = rate(self.level, self.params.release, self.sample_rate);
            self.stage = EnvelopeStage::Release;
        } else {
            self.reset();
        }
    }

    /// Advances the envelope by one sample and returns its level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => return 0.0,
            EnvelopeStage::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.go_to_next_stage();
                }
            }
            EnvelopeStage::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.params.sustain {
                    self.level = self.params.sustain;
                    self.go_to_next_stage();
                }
            }
            EnvelopeStage::Sustain => {
                self.level = self.params.sustain;
            }
            EnvelopeStage::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.go_to_next_stage();
                }
            }
        }

        self.level
    }

    fn go_to_next_stage(&mut self) {
        match self.stage {
            EnvelopeStage::Attack => {
                self.stage = if self.decay_rate > 0.0 {
                    EnvelopeStage::Decay
                } else {
                    EnvelopeStage::Sustain
                };
            }
            EnvelopeStage::Decay => self.stage = EnvelopeStage::Sustain,
            EnvelopeStage::Release => self.reset(),
            EnvelopeStage::Idle | EnvelopeStage::Sustain => {}
        }
    }

    fn recalculate_rates(&mut self) {
        let params = self.params;
        self.attack_rate = rate(1.0, params.attack, self.sample_rate);
        self.decay_rate = rate(1.0 - params.sustain, params.decay, self.sample_rate);
        self.release_rate = rate(params.sustain, params.release, self.sample_rate);

        let skip = match self.stage {
            EnvelopeStage::Attack => self.attack_rate <= 0.0,
            EnvelopeStage::Decay => self.decay_rate <= 0.0 || self.level <= params.sustain,
            EnvelopeStage::Release => self.release_rate <= 0.0,
            EnvelopeStage::Idle | EnvelopeStage::Sustain => false,
        };
        if skip {
            self.go_to_next_stage();
        }
    }
}

/// ADSR parameters shared between the UI thread and the audio thread.
///
/// Each field is stored atomically as raw `f32` bits. Writers bump the
/// generation after storing all four fields, so the audio thread only reads
/// the fields when the generation it last applied is stale.
#[derive(Debug)]
pub struct SharedAdsr {
    attack: AtomicU32,
    decay: AtomicU32,
    sustain: AtomicU32,
    release: AtomicU32,
    generation: AtomicU64,
}

impl Default for SharedAdsr {
    fn default() -> Self {
        Self::new(AdsrParams::default())
    }
}

impl SharedAdsr {
    pub fn new(params: AdsrParams) -> Self {
        let params = params.clamped();
        Self {
            attack: AtomicU32::new(params.attack.to_bits()),
            decay: AtomicU32::new(params.decay.to_bits()),
            sustain: AtomicU32::new(params.sustain.to_bits()),
            release: AtomicU32::new(params.release.to_bits()),
            generation: AtomicU64::new(0),
        }
    }

    /// Publishes new parameters. Called from the UI thread.
    pub fn publish(&self, params: AdsrParams) {
        let params = params.clamped();
        self.attack.store(params.attack.to_bits(), Ordering::Relaxed);
        self.decay.store(params.decay.to_bits(), Ordering::Relaxed);
        self.sustain.store(params.sustain.to_bits(), Ordering::Relaxed);
        self.release.store(params.release.to_bits(), Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Release);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> AdsrParams {
        AdsrParams {
            attack: f32::from_bits(self.attack.load(Ordering::Relaxed)),
            decay: f32::from_bits(self.decay.load(Ordering::Relaxed)),
            sustain: f32::from_bits(self.sustain.load(Ordering::Relaxed)),
            release: f32::from_bits(self.release.load(Ordering::Relaxed)),
        }
    }

    /// Returns the current parameters if they were published after `seen`,
    /// updating `seen` to the generation that was read.
    pub fn load_if_newer(&self, seen: &mut u64) -> Option<AdsrParams> {
        let generation = self.generation();
        if generation == *seen {
            return None;
        }

        *seen = generation;
        Some(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adsr_at(sample_rate: f64, params: AdsrParams) -> Adsr {
        let mut adsr = Adsr::new();
        adsr.set_sample_rate(sample_rate);
        adsr.set_parameters(params);
        adsr
    }

    #[test]
    fn test_default_params() {
        let params = AdsrParams::default();
        assert_eq!(params, AdsrParams::new(0.1, 0.1, 1.0, 0.1));
    }

    #[test]
    fn test_clamped_limits_each_field() {
        let params = AdsrParams::new(7.0, -1.0, 1.5, f32::NAN).clamped();
        assert_eq!(params, AdsrParams::new(5.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_attack_rises_linearly_to_peak() {
        let mut adsr = adsr_at(10.0, AdsrParams::new(1.0, 0.0, 1.0, 0.0));
        adsr.note_on();

        assert_eq!(adsr.stage(), EnvelopeStage::Attack);
        let levels: Vec<f32> = (0..12).map(|_| adsr.next_sample()).collect();
        assert!((levels[0] - 0.1).abs() < 1e-6);
        assert!((levels[4] - 0.5).abs() < 1e-5);
        assert!((levels[9] - 1.0).abs() < 1e-5);
        assert_eq!(levels[11], 1.0);
        assert_eq!(adsr.stage(), EnvelopeStage::Sustain);
    }

    #[test]
    fn test_decay_settles_on_sustain() {
        let mut adsr = adsr_at(10.0, AdsrParams::new(0.0, 1.0, 0.5, 0.0));
        adsr.note_on();

        assert_eq!(adsr.stage(), EnvelopeStage::Decay);
        for _ in 0..20 {
            adsr.next_sample();
        }
        assert_eq!(adsr.stage(), EnvelopeStage::Sustain);
        assert!((adsr.next_sample() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_stages_jump_to_sustain() {
        let mut adsr = adsr_at(48_000.0, AdsrParams::new(0.0, 0.0, 0.7, 0.0));
        adsr.note_on();

        assert_eq!(adsr.stage(), EnvelopeStage::Sustain);
        assert!((adsr.next_sample() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_release_falls_to_idle() {
        let mut adsr = adsr_at(10.0, AdsrParams::new(0.0, 0.0, 1.0, 0.5));
        adsr.note_on();
        adsr.next_sample();
        adsr.note_off();

        assert_eq!(adsr.stage(), EnvelopeStage::Release);
        let mut samples = 0;
        while adsr.is_active() && samples < 100 {
            adsr.next_sample();
            samples += 1;
        }
        assert!(!adsr.is_active());
        assert!((5..=6).contains(&samples));
        assert_eq!(adsr.next_sample(), 0.0);
    }

    #[test]
    fn test_note_off_without_release_stops_immediately() {
        let mut adsr = adsr_at(48_000.0, AdsrParams::new(0.0, 0.0, 1.0, 0.0));
        adsr.note_on();
        adsr.note_off();
        assert!(!adsr.is_active());
    }

    #[test]
    fn test_note_off_when_idle_is_ignored() {
        let mut adsr = Adsr::new();
        adsr.note_off();
        assert_eq!(adsr.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn test_shared_adsr_publishes_snapshot() {
        let shared = SharedAdsr::default();
        let mut seen = shared.generation();

        assert!(shared.load_if_newer(&mut seen).is_none());

        shared.publish(AdsrParams::new(2.5, 0.3, 0.4, 0.9));
        let params = shared.load_if_newer(&mut seen).expect("newer params");
        assert_eq!(params, AdsrParams::new(2.5, 0.3, 0.4, 0.9));
        assert!(shared.load_if_newer(&mut seen).is_none());
    }

    #[test]
    fn test_shared_adsr_clamps_on_publish() {
        let shared = SharedAdsr::default();
        shared.publish(AdsrParams::new(9.0, 2.0, 2.0, 2.0));
        assert_eq!(shared.snapshot(), AdsrParams::new(5.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_shared_adsr_concurrent_publish_and_load() {
        const PUBLISHES: u64 = 10_000;

        let shared = SharedAdsr::default();
        let calm = AdsrParams::new(0.5, 0.2, 0.3, 0.4);
        let wild = AdsrParams::new(9.0, -1.0, f32::NAN, 2.0);
        let wild_clamped = wild.clamped();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..PUBLISHES {
                    shared.publish(if i % 2 == 0 { wild } else { calm });
                }
            });

            let mut seen = shared.generation();
            let mut applied = 0;
            while seen < PUBLISHES {
                let previous = seen;
                let Some(params) = shared.load_if_newer(&mut seen) else {
                    std::thread::yield_now();
                    continue;
                };
                assert!(seen > previous);
                applied += 1;

                // Fields may come from different publishes, but each one is
                // a whole value some publish stored, already clamped.
                assert_eq!(params, params.clamped());
                assert!([calm.attack, wild_clamped.attack].contains(&params.attack));
                assert!([calm.decay, wild_clamped.decay].contains(&params.decay));
                assert!([calm.sustain, wild_clamped.sustain].contains(&params.sustain));
                assert!([calm.release, wild_clamped.release].contains(&params.release));
            }
            assert!(applied > 0);
        });

        assert_eq!(shared.snapshot(), calm);
    }
}
