#![forbid(unsafe_code)]

//! File-save chooser collaborator.
//!
//! The dialog asks a [`FileChooser`] for a destination when the user presses
//! "Choose file...". The call runs on a background task thread, so an
//! implementation may block for as long as its own modal surface is up.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// What the dialog knows when it asks for a destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveRequest {
    /// Name suggested by the drag source.
    pub suggested_name: Option<String>,
    /// File type selected so far, if any.
    pub file_type: Option<String>,
}

/// A chosen destination: a directory and a file name inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    /// Directory the file goes into.
    pub directory: PathBuf,
    /// File name inside `directory`.
    pub name: String,
}

impl SaveTarget {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// The full destination path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}

/// Picks a save destination. `None` means the user dismissed the chooser.
pub trait FileChooser: Send + Sync {
    fn choose(&self, request: &SaveRequest) -> Option<SaveTarget>;
}

impl<F> FileChooser for F
where
    F: Fn(&SaveRequest) -> Option<SaveTarget> + Send + Sync,
{
    fn choose(&self, request: &SaveRequest) -> Option<SaveTarget> {
        self(request)
    }
}

/// A chooser that is always dismissed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DismissingChooser;

impl FileChooser for DismissingChooser {
    fn choose(&self, _request: &SaveRequest) -> Option<SaveTarget> {
        None
    }
}

/// A chooser that answers with a fixed directory.
///
/// The file name is the suggested name from the request when there is one,
/// otherwise `fallback_name`.
#[derive(Debug, Clone)]
pub struct FixedChooser {
    directory: PathBuf,
    fallback_name: String,
    requests: Arc<Mutex<Vec<SaveRequest>>>,
}

impl FixedChooser {
    pub fn new(directory: impl Into<PathBuf>, fallback_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            fallback_name: fallback_name.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Requests seen so far, shared between clones.
    #[must_use]
    pub fn requests(&self) -> Vec<SaveRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileChooser for FixedChooser {
    fn choose(&self, request: &SaveRequest) -> Option<SaveTarget> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let name = request
            .suggested_name
            .clone()
            .unwrap_or_else(|| self.fallback_name.clone());
        Some(SaveTarget::new(self.directory.clone(), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_joins_directory_and_name() {
        let target = SaveTarget::new("/tmp/drops", "clip.txt");
        assert_eq!(target.path(), Path::new("/tmp/drops/clip.txt"));
    }

    #[test]
    fn fixed_chooser_prefers_suggested_name() {
        let chooser = FixedChooser::new("/tmp", "untitled");
        let plain = chooser.choose(&SaveRequest::default()).unwrap();
        assert_eq!(plain.name, "untitled");

        let named = chooser
            .choose(&SaveRequest {
                suggested_name: Some("notes".into()),
                file_type: None,
            })
            .unwrap();
        assert_eq!(named.path(), Path::new("/tmp/notes"));
        assert_eq!(chooser.requests().len(), 2);
    }

    #[test]
    fn closures_are_choosers() {
        let chooser = |_: &SaveRequest| -> Option<SaveTarget> { None };
        assert_eq!(chooser.choose(&SaveRequest::default()), None);
        assert_eq!(DismissingChooser.choose(&SaveRequest::default()), None);
    }
}
