use std::path::PathBuf;

/// Asks the user for one or more directories.
///
/// `None` means the user cancelled; an empty list is treated the same way by callers.
pub trait DirectoryPicker {
    fn pick_directories(&self) -> Option<Vec<PathBuf>>;
}

/// Returns a fixed answer. Used in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedDirectoryPicker(pub Option<Vec<PathBuf>>);

impl DirectoryPicker for FixedDirectoryPicker {
    fn pick_directories(&self) -> Option<Vec<PathBuf>> {
        self.0.clone()
    }
}
