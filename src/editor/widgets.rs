//! Widget models for the editor: bounds, knobs, captions and the load button.

use std::fmt;

use crate::processor::constants::{
    ATTACK_MAX, ATTACK_MIN, DECAY_MAX, DECAY_MIN, LABEL_FONT_HEIGHT, RELEASE_MAX, RELEASE_MIN,
    SLIDER_INTERVAL, SLIDER_TEXT_BOX_HEIGHT, SLIDER_TEXT_BOX_WIDTH, SUSTAIN_MAX, SUSTAIN_MIN,
};

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds given as fractions of a parent of size `parent_width` x `parent_height`.
    pub fn relative(
        parent_width: f32,
        parent_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self::new(
            (parent_width * x).round(),
            (parent_height * y).round(),
            (parent_width * width).round(),
            (parent_height * height).round(),
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

// =============================================================================
// Sliders
// =============================================================================

/// The four envelope knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderId {
    Attack,
    Decay,
    Sustain,
    Release,
}

impl SliderId {
    /// Left to right.
    pub const ALL: [Self; 4] = [Self::Attack, Self::Decay, Self::Sustain, Self::Release];

    pub fn index(self) -> usize {
        match self {
            Self::Attack => 0,
            Self::Decay => 1,
            Self::Sustain => 2,
            Self::Release => 3,
        }
    }

    /// Caption shown above the knob.
    pub fn label(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Decay => "Decay",
            Self::Sustain => "Sustain",
            Self::Release => "Release",
        }
    }

    /// Case-insensitive lookup by caption.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.label().eq_ignore_ascii_case(name))
    }

    /// Value range of the knob.
    pub fn range(self) -> (f64, f64) {
        let (min, max) = match self {
            Self::Attack => (ATTACK_MIN, ATTACK_MAX),
            Self::Decay => (DECAY_MIN, DECAY_MAX),
            Self::Sustain => (SUSTAIN_MIN, SUSTAIN_MAX),
            Self::Release => (RELEASE_MIN, RELEASE_MAX),
        };
        (f64::from(min), f64::from(max))
    }
}

impl fmt::Display for SliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vertical alignment of a caption's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    CentredTop,
    Centred,
}

/// A text caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_height: f32,
    pub justification: Justification,
    pub bounds: Rect,
}

impl Label {
    pub fn new(text: impl Into<String>, font_height: f32, justification: Justification) -> Self {
        Self {
            text: text.into(),
            font_height,
            justification,
            bounds: Rect::default(),
        }
    }

    /// Places the label directly above `owner`, spanning its width.
    pub fn attach_above(&mut self, owner: Rect) {
        let height = (self.font_height * 1.5).round();
        self.bounds = Rect::new(owner.x, owner.y - height, owner.width, height);
    }
}

/// Where a slider shows its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub read_only: bool,
    pub width: f32,
    pub height: f32,
}

/// A rotary knob with a value box below and a caption above.
#[derive(Debug, Clone, PartialEq)]
pub struct RotarySlider {
    min: f64,
    max: f64,
    interval: f64,
    value: f64,
    bounds: Rect,
    text_box: TextBox,
    label: Label,
}

impl RotarySlider {
    pub fn new(caption: &str, min: f64, max: f64, interval: f64) -> Self {
        Self {
            min,
            max,
            interval,
            value: min,
            bounds: Rect::default(),
            text_box: TextBox {
                read_only: true,
                width: SLIDER_TEXT_BOX_WIDTH,
                height: SLIDER_TEXT_BOX_HEIGHT,
            },
            label: Label::new(caption, LABEL_FONT_HEIGHT, Justification::CentredTop),
        }
    }

    /// Knob for one envelope field, stepping by 0.01.
    pub fn for_envelope(id: SliderId) -> Self {
        let (min, max) = id.range();
        Self::new(id.label(), min, max, SLIDER_INTERVAL)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Clamps to the range and snaps to the nearest step.
    pub fn constrained_value(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }

        let mut value = value.clamp(self.min, self.max);
        if self.interval > 0.0 {
            let steps = ((value - self.min) / self.interval).round();
            value = (self.min + steps * self.interval).clamp(self.min, self.max);
        }
        value
    }

    /// Sets the value. Returns true if it changed.
    pub fn set_value(&mut self, value: f64) -> bool {
        let value = self.constrained_value(value);
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// Contents of the value box.
    pub fn text(&self) -> String {
        format!("{:.2}", self.value)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.label.attach_above(bounds);
    }

    pub fn text_box(&self) -> TextBox {
        self.text_box
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

/// A clickable button with a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct TextButton {
    pub text: String,
    pub bounds: Rect,
}

impl TextButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounds: Rect::default(),
        }
    }

    pub fn hit_test(&self, x: f32, y: f32) -> bool {
        self.bounds.contains(x, y)
    }
}
