#![forbid(unsafe_code)]

//! Dialog population.
//!
//! [`DialogView`] is a toolkit-neutral description of the drop dialog: one
//! menu item per offered type, file type, and action, a drop-as-file
//! checkbox, a file chooser button, and the cancel/confirm buttons. Each
//! control carries the [`DialogEvent`] it posts when activated, so a
//! frontend only has to render controls and forward their events.
//!
//! Enabled states follow the toggle: the type menu is live while dropping
//! directly, the file-type menu and chooser button while dropping as a file.
//! Everything is disabled while the nested file chooser is open.

use crate::action::DropAction;
use crate::config::DialogConfig;
use crate::event::DialogEvent;
use crate::offer::OfferSpec;
use crate::selection::SelectionState;
use std::path::PathBuf;

/// One entry of a popup menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown for the entry.
    pub label: String,
    /// Event posted when the entry is picked.
    pub event: DialogEvent,
    /// Whether this is the currently selected entry.
    pub marked: bool,
}

/// A labelled popup menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuField {
    pub label: String,
    /// Shown while nothing is selected.
    pub placeholder: String,
    pub items: Vec<MenuItem>,
    pub enabled: bool,
}

impl MenuField {
    /// The selected entry, if any.
    #[must_use]
    pub fn marked(&self) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.marked)
    }

    /// Index of the selected entry, if any.
    #[must_use]
    pub fn marked_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.marked)
    }

    /// Text for the closed menu: the selected label or the placeholder.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.marked()
            .map_or(self.placeholder.as_str(), |item| item.label.as_str())
    }

    /// Find an entry by its label.
    #[must_use]
    pub fn item(&self, label: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

/// A check box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub label: String,
    pub checked: bool,
    pub enabled: bool,
}

impl Checkbox {
    /// Event posted when the box is clicked.
    #[must_use]
    pub fn toggle_event(&self) -> DialogEvent {
        DialogEvent::ToggleDropAsFile(!self.checked)
    }
}

/// A push button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub event: DialogEvent,
    pub enabled: bool,
}

/// A control in tab order, for frontends that navigate between controls.
#[derive(Debug, Clone, Copy)]
pub enum Control<'a> {
    Menu(&'a MenuField),
    Checkbox(&'a Checkbox),
    Button(&'a Button),
}

impl Control<'_> {
    /// Whether the control accepts input.
    #[must_use]
    pub fn enabled(&self) -> bool {
        match self {
            Self::Menu(m) => m.enabled,
            Self::Checkbox(c) => c.enabled,
            Self::Button(b) => b.enabled,
        }
    }
}

/// Snapshot of everything a frontend needs to draw the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    /// Clip name offered by the source, if any.
    pub subtitle: Option<String>,
    pub type_menu: MenuField,
    pub drop_as_file: Checkbox,
    pub file_type_menu: MenuField,
    pub choose_file: Button,
    /// Destination picked through the chooser.
    pub destination: Option<PathBuf>,
    pub action_menu: MenuField,
    /// Feedback after a refused confirmation.
    pub status: Option<String>,
    pub cancel: Button,
    pub confirm: Button,
    /// Whether confirming would currently succeed.
    pub ready: bool,
    /// Whether the nested file chooser is showing.
    pub chooser_open: bool,
}

/// Inputs for [`DialogView::build`].
pub struct ViewInputs<'a> {
    pub offer: &'a OfferSpec,
    pub selection: &'a SelectionState,
    pub config: &'a DialogConfig,
    pub labeler: &'a dyn Fn(DropAction) -> String,
    pub status: Option<&'a str>,
    pub chooser_open: bool,
}

impl DialogView {
    /// Populate the dialog from the offer and the current selection.
    #[must_use]
    pub fn build(inputs: ViewInputs<'_>) -> Self {
        let ViewInputs {
            offer,
            selection,
            config,
            labeler,
            status,
            chooser_open,
        } = inputs;
        let live = !chooser_open;
        let as_file = selection.drop_as_file();

        let type_menu = MenuField {
            label: config.type_label.clone(),
            placeholder: config.type_placeholder.clone(),
            items: offer
                .direct_types()
                .map(|(id, label)| MenuItem {
                    label: label.to_string(),
                    event: DialogEvent::SelectType(id.to_string()),
                    marked: selection.selected_type() == Some(id),
                })
                .collect(),
            enabled: live && !as_file,
        };

        let file_type_menu = MenuField {
            label: config.file_type_label.clone(),
            placeholder: config.file_type_placeholder.clone(),
            items: offer
                .file_types()
                .iter()
                .map(|id| MenuItem {
                    label: id.clone(),
                    event: DialogEvent::SelectFileType(id.clone()),
                    marked: selection.selected_file_type() == Some(id.as_str()),
                })
                .collect(),
            enabled: live && as_file,
        };

        let action_menu = MenuField {
            label: config.action_label.clone(),
            placeholder: config.action_placeholder.clone(),
            items: offer
                .actions()
                .iter()
                .map(|&action| MenuItem {
                    label: labeler(action),
                    event: DialogEvent::SelectAction(action),
                    marked: selection.selected_action() == Some(action),
                })
                .collect(),
            enabled: live,
        };

        Self {
            title: config.title.clone(),
            subtitle: offer.clip_name().map(str::to_owned),
            type_menu,
            drop_as_file: Checkbox {
                label: config.drop_as_file_label.clone(),
                checked: as_file,
                enabled: live && offer.offers_file(),
            },
            file_type_menu,
            choose_file: Button {
                label: config.choose_file_label.clone(),
                event: DialogEvent::OpenFileChooser,
                enabled: live && as_file,
            },
            destination: selection.destination().map(|p| p.to_path_buf()),
            action_menu,
            status: status.map(str::to_owned),
            cancel: Button {
                label: config.cancel_label.clone(),
                event: DialogEvent::Cancel,
                enabled: live,
            },
            confirm: Button {
                label: config.confirm_label.clone(),
                event: DialogEvent::Confirm,
                enabled: live,
            },
            ready: selection.is_ready(),
            chooser_open,
        }
    }

    /// Controls in tab order.
    #[must_use]
    pub fn controls(&self) -> Vec<Control<'_>> {
        vec![
            Control::Menu(&self.type_menu),
            Control::Checkbox(&self.drop_as_file),
            Control::Menu(&self.file_type_menu),
            Control::Button(&self.choose_file),
            Control::Menu(&self.action_menu),
            Control::Button(&self.cancel),
            Control::Button(&self.confirm),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action_label;
    use crate::offer::{FILE_SENTINEL, RawOffer};

    fn offer() -> OfferSpec {
        OfferSpec::parse(
            &RawOffer::new()
                .with_types(["text/plain", "text/html", FILE_SENTINEL])
                .with_file_types(["text/plain", "application/pdf"])
                .with_actions([DropAction::COPY, DropAction::MOVE])
                .with_clip_name("clipping"),
        )
        .unwrap()
    }

    fn build(offer: &OfferSpec, selection: &SelectionState, chooser_open: bool) -> DialogView {
        DialogView::build(ViewInputs {
            offer,
            selection,
            config: &DialogConfig::default(),
            labeler: &action_label,
            status: None,
            chooser_open,
        })
    }

    #[test]
    fn one_item_per_entry_and_sentinel_hidden() {
        let offer = offer();
        let view = build(&offer, &SelectionState::new(), false);
        let types: Vec<_> = view.type_menu.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(types, ["text/plain", "text/html"]);
        assert_eq!(view.file_type_menu.items.len(), 2);
        let actions: Vec<_> = view.action_menu.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(actions, ["Copy", "Move"]);
        assert_eq!(view.subtitle.as_deref(), Some("clipping"));
    }

    #[test]
    fn items_are_bound_to_events() {
        let offer = offer();
        let view = build(&offer, &SelectionState::new(), false);
        assert_eq!(
            view.type_menu.items[1].event,
            DialogEvent::SelectType("text/html".into())
        );
        assert_eq!(
            view.action_menu.items[1].event,
            DialogEvent::SelectAction(DropAction::MOVE)
        );
        assert_eq!(view.drop_as_file.toggle_event(), DialogEvent::ToggleDropAsFile(true));
    }

    #[test]
    fn toggle_switches_enabled_menus() {
        let offer = offer();
        let mut selection = SelectionState::new();
        let view = build(&offer, &selection, false);
        assert!(view.type_menu.enabled);
        assert!(!view.file_type_menu.enabled);
        assert!(!view.choose_file.enabled);

        selection.on_toggle_drop_as_file(true);
        let view = build(&offer, &selection, false);
        assert!(!view.type_menu.enabled);
        assert!(view.file_type_menu.enabled);
        assert!(view.choose_file.enabled);
    }

    #[test]
    fn marks_follow_selection() {
        let offer = offer();
        let mut selection = SelectionState::new();
        let view = build(&offer, &selection, false);
        assert_eq!(view.type_menu.display_text(), "(choose drop data type)");

        selection.on_select_type("text/html");
        selection.on_select_action(DropAction::COPY);
        let view = build(&offer, &selection, false);
        assert_eq!(view.type_menu.marked_index(), Some(1));
        assert_eq!(view.action_menu.display_text(), "Copy");
        assert!(view.ready);
    }

    #[test]
    fn chooser_disables_everything() {
        let offer = offer();
        let view = build(&offer, &SelectionState::new(), true);
        assert!(view.controls().iter().all(|c| !c.enabled()));
    }

    #[test]
    fn checkbox_disabled_without_file_types() {
        let offer = OfferSpec::parse(
            &RawOffer::new()
                .with_types(["text/plain"])
                .with_actions([DropAction::COPY]),
        )
        .unwrap();
        let view = build(&offer, &SelectionState::new(), false);
        assert!(!view.drop_as_file.enabled);
        assert!(view.file_type_menu.items.is_empty());
    }
}
