//! Drawing surface used by the editor.
//!
//! The editor never talks to a windowing toolkit directly. It paints through
//! the [`Graphics`] trait; a front end implements it for its own canvas and
//! [`PathRecorder`] keeps the calls for inspection.

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// One segment instruction of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    StartNewSubPath { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
}

impl PathElement {
    pub fn point(&self) -> (f32, f32) {
        match *self {
            Self::StartNewSubPath { x, y } | Self::LineTo { x, y } => (x, y),
        }
    }
}

/// A sequence of connected line segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn start_new_sub_path(&mut self, x: f32, y: f32) {
        self.elements.push(PathElement::StartNewSubPath { x, y });
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.elements.push(PathElement::LineTo { x, y });
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of `line_to` segments.
    pub fn num_segments(&self) -> usize {
        self.elements
            .iter()
            .filter(|element| matches!(element, PathElement::LineTo { .. }))
            .count()
    }
}

/// Canvas operations the editor paints with.
pub trait Graphics {
    fn fill_all(&mut self, colour: Colour);

    fn set_colour(&mut self, colour: Colour);

    fn stroke_path(&mut self, path: &Path, thickness: f32);
}

/// A recorded [`Graphics`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillAll(Colour),
    SetColour(Colour),
    StrokePath { path: Path, thickness: f32 },
}

/// [`Graphics`] implementation that records every call.
#[derive(Debug, Default)]
pub struct PathRecorder {
    commands: Vec<DrawCommand>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// The most recently stroked path, if any.
    pub fn last_stroked_path(&self) -> Option<&Path> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::StrokePath { path, .. } => Some(path),
            _ => None,
        })
    }
}

impl Graphics for PathRecorder {
    fn fill_all(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::FillAll(colour));
    }

    fn set_colour(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::SetColour(colour));
    }

    fn stroke_path(&mut self, path: &Path, thickness: f32) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            thickness,
        });
    }
}
