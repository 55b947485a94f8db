#![forbid(unsafe_code)]

//! Dialog text configuration.

/// Labels and captions used when populating the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// Window title.
    pub title: String,
    /// Label of the data type menu.
    pub type_label: String,
    /// Placeholder shown while no data type is chosen.
    pub type_placeholder: String,
    /// Label of the file type menu.
    pub file_type_label: String,
    /// Placeholder shown while no file type is chosen.
    pub file_type_placeholder: String,
    /// Label of the action menu.
    pub action_label: String,
    /// Placeholder shown while no action is chosen.
    pub action_placeholder: String,
    /// Caption of the drop-as-file checkbox.
    pub drop_as_file_label: String,
    /// Caption of the file chooser button.
    pub choose_file_label: String,
    /// Caption of the cancel button.
    pub cancel_label: String,
    /// Caption of the confirm button.
    pub confirm_label: String,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: "Drop Parameters".into(),
            type_label: "Data Type".into(),
            type_placeholder: "(choose drop data type)".into(),
            file_type_label: "File Type".into(),
            file_type_placeholder: "(choose file data type)".into(),
            action_label: "Drop Action".into(),
            action_placeholder: "(choose drop action)".into(),
            drop_as_file_label: "Drop as file".into(),
            choose_file_label: "Choose file...".into(),
            cancel_label: "Cancel".into(),
            confirm_label: "Drop".into(),
        }
    }
}

impl DialogConfig {
    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the cancel and confirm button captions.
    #[must_use]
    pub fn with_buttons(mut self, cancel: impl Into<String>, confirm: impl Into<String>) -> Self {
        self.cancel_label = cancel.into();
        self.confirm_label = confirm.into();
        self
    }
}
