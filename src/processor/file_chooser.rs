//! Interactive file selection.

use std::path::PathBuf;

/// Opens a "pick a file" dialog on behalf of the processor.
pub trait FileChooser: Send {
    /// Returns the chosen file, or `None` when the user cancelled.
    ///
    /// # Parameters
    ///
    /// - `title`: Dialog title
    /// - `wildcard`: Semicolon separated patterns such as `*.wav;*.mp3`
    fn browse_for_file_to_open(&mut self, title: &str, wildcard: &str) -> Option<PathBuf>;
}

/// Chooser used until a front end installs a real dialog. Always cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFileChooser;

impl FileChooser for NoFileChooser {
    fn browse_for_file_to_open(&mut self, _title: &str, _wildcard: &str) -> Option<PathBuf> {
        None
    }
}

impl<F> FileChooser for F
where
    F: FnMut(&str, &str) -> Option<PathBuf> + Send,
{
    fn browse_for_file_to_open(&mut self, title: &str, wildcard: &str) -> Option<PathBuf> {
        self(title, wildcard)
    }
}
