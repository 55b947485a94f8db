#![forbid(unsafe_code)]

//! Keyboard navigation over a [`DialogView`].
//!
//! Focus is an index into [`DialogView::controls`]. Keys either move focus
//! locally (only a redraw is needed) or activate the focused control, which
//! yields the [`DialogEvent`] bound to it.
//!
//! | Key                    | Effect                                   |
//! |------------------------|------------------------------------------|
//! | Tab, Down              | next enabled control                     |
//! | Shift-Tab, Up          | previous enabled control                 |
//! | Right, Enter, Space    | next menu item / toggle / press button   |
//! | Left                   | previous menu item                       |
//! | Esc, q, Ctrl-C         | close the window                         |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dropneg_core::{Control, DialogEvent, DialogView, MenuField};

/// What the frontend should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Forward this event to the dialog.
    Post(DialogEvent),
    /// Only local state changed.
    Redraw,
    /// Nothing to do.
    Ignore,
}

/// Focus position within the dialog's controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus {
    index: usize,
}

impl Focus {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move onto an enabled control if the focused one is disabled.
    ///
    /// Returns false when nothing is enabled.
    pub fn settle(&mut self, view: &DialogView) -> bool {
        let controls = view.controls();
        if controls.get(self.index).is_some_and(Control::enabled) {
            return true;
        }
        match self.step(&controls, 1) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    fn step(&self, controls: &[Control<'_>], forward: isize) -> Option<usize> {
        let len = controls.len() as isize;
        (1..=len)
            .map(|offset| (self.index as isize + forward * offset).rem_euclid(len) as usize)
            .find(|&i| controls[i].enabled())
    }

    fn advance(&mut self, view: &DialogView, forward: isize) -> Reaction {
        match self.step(&view.controls(), forward) {
            Some(index) if index != self.index => {
                self.index = index;
                Reaction::Redraw
            }
            _ => Reaction::Ignore,
        }
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, view: &DialogView, key: KeyEvent) -> Reaction {
        if key.kind != KeyEventKind::Press {
            return Reaction::Ignore;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Reaction::Post(DialogEvent::Cancel),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Reaction::Post(DialogEvent::Cancel);
            }
            _ => {}
        }
        if !self.settle(view) {
            return Reaction::Ignore;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.advance(view, 1),
            KeyCode::BackTab | KeyCode::Up => self.advance(view, -1),
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => self.activate(view, 1),
            KeyCode::Left => self.activate(view, -1),
            _ => Reaction::Ignore,
        }
    }

    fn activate(&self, view: &DialogView, direction: isize) -> Reaction {
        let controls = view.controls();
        match controls.get(self.index) {
            Some(Control::Menu(menu)) => cycle_menu(menu, direction),
            Some(Control::Checkbox(checkbox)) if direction > 0 => {
                Reaction::Post(checkbox.toggle_event())
            }
            Some(Control::Button(button)) if direction > 0 => Reaction::Post(button.event.clone()),
            _ => Reaction::Ignore,
        }
    }
}

/// Pick the item next to the marked one, wrapping around.
fn cycle_menu(menu: &MenuField, direction: isize) -> Reaction {
    let len = menu.items.len() as isize;
    if len == 0 {
        return Reaction::Ignore;
    }
    let next = match menu.marked_index() {
        Some(i) => (i as isize + direction).rem_euclid(len),
        None if direction > 0 => 0,
        None => len - 1,
    };
    Reaction::Post(menu.items[next as usize].event.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropneg_core::{
        DialogConfig, DropAction, FILE_SENTINEL, OfferSpec, RawOffer, SelectionState, ViewInputs,
        action_label,
    };

    fn view(selection: &SelectionState, chooser_open: bool) -> DialogView {
        let offer = OfferSpec::parse(
            &RawOffer::new()
                .with_types(["text/plain", "text/html", FILE_SENTINEL])
                .with_file_types(["text/plain"])
                .with_actions([DropAction::COPY, DropAction::MOVE]),
        )
        .unwrap();
        DialogView::build(ViewInputs {
            offer: &offer,
            selection,
            config: &DialogConfig::default(),
            labeler: &action_label,
            status: None,
            chooser_open,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tab_skips_disabled_controls() {
        let v = view(&SelectionState::new(), false);
        let mut focus = Focus::default();
        assert_eq!(focus.handle_key(&v, key(KeyCode::Tab)), Reaction::Redraw);
        assert_eq!(focus.index(), 1);
        // File type menu and chooser button are disabled while dropping directly.
        assert_eq!(focus.handle_key(&v, key(KeyCode::Tab)), Reaction::Redraw);
        assert_eq!(focus.index(), 4);
        assert_eq!(focus.handle_key(&v, key(KeyCode::BackTab)), Reaction::Redraw);
        assert_eq!(focus.index(), 1);
    }

    #[test]
    fn menus_cycle_through_items() {
        let mut selection = SelectionState::new();
        let mut focus = Focus::default();
        let v = view(&selection, false);
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Right)),
            Reaction::Post(DialogEvent::SelectType("text/plain".into()))
        );
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Left)),
            Reaction::Post(DialogEvent::SelectType("text/html".into()))
        );

        selection.on_select_type("text/html");
        let v = view(&selection, false);
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Enter)),
            Reaction::Post(DialogEvent::SelectType("text/plain".into()))
        );
    }

    #[test]
    fn checkbox_and_buttons_activate() {
        let v = view(&SelectionState::new(), false);
        let mut focus = Focus { index: 1 };
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Char(' '))),
            Reaction::Post(DialogEvent::ToggleDropAsFile(true))
        );
        let mut focus = Focus { index: 6 };
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Enter)),
            Reaction::Post(DialogEvent::Confirm)
        );
        assert_eq!(focus.handle_key(&v, key(KeyCode::Left)), Reaction::Ignore);
    }

    #[test]
    fn escape_and_ctrl_c_close() {
        let v = view(&SelectionState::new(), true);
        let mut focus = Focus::default();
        assert_eq!(
            focus.handle_key(&v, key(KeyCode::Esc)),
            Reaction::Post(DialogEvent::Cancel)
        );
        assert_eq!(
            focus.handle_key(&v, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Reaction::Post(DialogEvent::Cancel)
        );
    }

    #[test]
    fn nothing_enabled_while_chooser_open() {
        let v = view(&SelectionState::new(), true);
        let mut focus = Focus::default();
        assert!(!focus.settle(&v));
        assert_eq!(focus.handle_key(&v, key(KeyCode::Enter)), Reaction::Ignore);
    }

    #[test]
    fn settle_moves_off_disabled_control() {
        let mut selection = SelectionState::new();
        selection.on_toggle_drop_as_file(true);
        let v = view(&selection, false);
        let mut focus = Focus::default();
        assert!(focus.settle(&v));
        assert_eq!(focus.index(), 1);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn selection() -> impl Strategy<Value = SelectionState> {
            (
                any::<bool>(),
                prop::option::of(prop_oneof![Just("text/plain"), Just("text/html")]),
                any::<bool>(),
                prop::option::of(prop_oneof![Just(DropAction::COPY), Just(DropAction::MOVE)]),
            )
                .prop_map(|(as_file, ty, file_ty, action)| {
                    let mut selection = SelectionState::new();
                    selection.on_toggle_drop_as_file(as_file);
                    if let Some(ty) = ty {
                        selection.on_select_type(ty);
                    }
                    if file_ty {
                        selection.on_select_file_type("text/plain");
                    }
                    if let Some(action) = action {
                        selection.on_select_action(action);
                    }
                    selection
                })
        }

        fn key_code() -> impl Strategy<Value = KeyCode> {
            prop_oneof![
                Just(KeyCode::Tab),
                Just(KeyCode::BackTab),
                Just(KeyCode::Up),
                Just(KeyCode::Down),
                Just(KeyCode::Left),
                Just(KeyCode::Right),
                Just(KeyCode::Enter),
                Just(KeyCode::Char(' ')),
                Just(KeyCode::Char('x')),
            ]
        }

        fn bound_to(control: &Control<'_>, event: &DialogEvent) -> bool {
            match control {
                Control::Menu(menu) => menu.items.iter().any(|item| &item.event == event),
                Control::Checkbox(checkbox) => &checkbox.toggle_event() == event,
                Control::Button(button) => &button.event == event,
            }
        }

        proptest! {
            #[test]
            fn keys_only_reach_enabled_focused_controls(
                selection in selection(),
                chooser_open in any::<bool>(),
                start in 0usize..7,
                keys in prop::collection::vec(key_code(), 0..32),
            ) {
                let v = view(&selection, chooser_open);
                let controls = v.controls();
                let mut focus = Focus { index: start };
                for code in keys {
                    let reaction = focus.handle_key(&v, key(code));
                    prop_assert!(focus.index() < controls.len());
                    if let Reaction::Post(event) = reaction {
                        prop_assert!(!chooser_open, "posted {:?} while chooser open", event);
                        let focused = &controls[focus.index()];
                        prop_assert!(focused.enabled());
                        prop_assert!(bound_to(focused, &event));
                    }
                }
            }
        }
    }
}
