//! Property tests for the text helpers used by scripts and snapshots.

use dropneg_core::{
    Control, DialogConfig, DialogView, DropAction, FILE_SENTINEL, OfferSpec, RawOffer,
    SelectionState, ViewInputs, action_label,
};
use dropneg_harness::diff_text;
use dropneg_harness::scripted::find_control;
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c ]{0,4}", 0..6).prop_map(|lines| lines.join("\n"))
}

fn view(as_file: bool, typed: bool, chooser_open: bool) -> DialogView {
    let offer = OfferSpec::parse(
        &RawOffer::new()
            .with_types(["text/plain", "text/html", FILE_SENTINEL])
            .with_file_types(["text/plain", "application/pdf"])
            .with_actions([DropAction::COPY, DropAction::LINK]),
    )
    .unwrap();
    let mut selection = SelectionState::new();
    selection.on_toggle_drop_as_file(as_file);
    if typed {
        selection.on_select_type("text/html");
    }
    DialogView::build(ViewInputs {
        offer: &offer,
        selection: &selection,
        config: &DialogConfig::default(),
        labeler: &action_label,
        status: None,
        chooser_open,
    })
}

fn labels(control: &Control<'_>) -> Vec<String> {
    match control {
        Control::Menu(menu) => menu.items.iter().map(|item| item.label.clone()).collect(),
        Control::Checkbox(checkbox) => vec![checkbox.label.clone()],
        Control::Button(button) => vec![button.label.clone()],
    }
}

proptest! {
    #[test]
    fn diff_is_empty_exactly_when_lines_match(expected in text(), actual in text()) {
        let diff = diff_text(&expected, &actual);
        prop_assert_eq!(diff.is_empty(), expected.lines().eq(actual.lines()));
        prop_assert!(diff_text(&expected, &expected).is_empty());
    }

    #[test]
    fn diff_keeps_every_line_of_both_sides(expected in text(), actual in text()) {
        let diff = diff_text(&expected, &actual);
        if !diff.is_empty() {
            let common = diff.lines().filter(|l| l.starts_with(' ')).count();
            let removed = diff.lines().filter(|l| l.starts_with('-')).count();
            let added = diff.lines().filter(|l| l.starts_with('+')).count();
            prop_assert_eq!(common + removed, expected.lines().count());
            prop_assert_eq!(common + added, actual.lines().count());
        }
    }

    #[test]
    fn every_enabled_label_can_be_picked(
        as_file in any::<bool>(),
        typed in any::<bool>(),
        chooser_open in any::<bool>(),
    ) {
        let v = view(as_file, typed, chooser_open);
        for control in v.controls() {
            for label in labels(&control) {
                let found = find_control(&v, &label);
                if control.enabled() {
                    prop_assert!(found.is_some(), "{} not found", label);
                }
                if chooser_open {
                    prop_assert_eq!(found, None);
                }
            }
        }
    }
}
