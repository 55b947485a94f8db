#![forbid(unsafe_code)]

//! Test harness for drop dialogs.
//!
//! - **Scripted frontends**: [`Script`] drives a real [`Negotiator`] on its
//!   UI thread the way a user would, and a [`Transcript`] records every
//!   frame it saw.
//! - **Snapshot testing**: [`view_to_text`] renders a [`DialogView`] as plain
//!   text and [`assert_snapshot!`] compares it against stored `.snap` files.
//!
//! # Quick Start
//!
//! ```ignore
//! use dropneg_harness::{Script, assert_snapshot, scripted_negotiator};
//!
//! let (negotiator, transcript) =
//!     scripted_negotiator(Script::new().pick("text/plain").pick("Copy").pick("Drop"));
//! let outcome = negotiator.negotiate(&offer)?;
//! assert_snapshot!("after_pick", &transcript.last_view().unwrap());
//! ```
//!
//! # Updating Snapshots
//!
//! Run tests with `BLESS=1` to create or update snapshot files:
//!
//! ```sh
//! BLESS=1 cargo test
//! ```
//!
//! Snapshot files are stored under `tests/snapshots/` relative to the
//! crate's `CARGO_MANIFEST_DIR`.
//!
//! [`Negotiator`]: dropneg_runtime::Negotiator

pub mod scripted;

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use dropneg_core::{Button, Checkbox, DialogView, MenuField};

pub use scripted::{Script, ScriptedFrontend, Step, Transcript, scripted_negotiator};

// ============================================================================
// View → Text Conversion
// ============================================================================

fn disabled_suffix(enabled: bool) -> &'static str {
    if enabled { "" } else { " (disabled)" }
}

fn write_menu(out: &mut String, menu: &MenuField) {
    let _ = writeln!(
        out,
        "{}: {}{}",
        menu.label,
        menu.display_text(),
        disabled_suffix(menu.enabled)
    );
    for item in &menu.items {
        let mark = if item.marked { '*' } else { ' ' };
        let _ = writeln!(out, "  {mark} {}", item.label);
    }
}

fn write_checkbox(out: &mut String, checkbox: &Checkbox) {
    let mark = if checkbox.checked { 'x' } else { ' ' };
    let _ = writeln!(
        out,
        "[{mark}] {}{}",
        checkbox.label,
        disabled_suffix(checkbox.enabled)
    );
}

fn button_text(button: &Button) -> String {
    format!("[{}]{}", button.label, disabled_suffix(button.enabled))
}

/// Render a view as plain text, one control per line.
///
/// Menus list their items below the closed-menu line with `*` on the
/// selected entry. Disabled controls carry a `(disabled)` suffix. The last
/// line holds the buttons, followed by `ready` when confirming would succeed.
pub fn view_to_text(view: &DialogView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    if let Some(subtitle) = &view.subtitle {
        let _ = writeln!(out, "\"{subtitle}\"");
    }
    write_menu(&mut out, &view.type_menu);
    write_checkbox(&mut out, &view.drop_as_file);
    write_menu(&mut out, &view.file_type_menu);
    let _ = writeln!(out, "{}", button_text(&view.choose_file));
    if let Some(destination) = &view.destination {
        let _ = writeln!(out, "Destination: {}", destination.display());
    }
    write_menu(&mut out, &view.action_menu);
    if view.chooser_open {
        let _ = writeln!(out, "(choosing file)");
    }
    if let Some(status) = &view.status {
        let _ = writeln!(out, "Status: {status}");
    }
    let _ = write!(
        out,
        "{} {}",
        button_text(&view.cancel),
        button_text(&view.confirm)
    );
    if view.ready {
        out.push_str(" ready");
    }
    out
}

// ============================================================================
// Match Modes & Normalization
// ============================================================================

/// Comparison mode for snapshot testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Byte-exact string comparison.
    Exact,
    /// Trim trailing whitespace on each line before comparing.
    TrimTrailing,
}

fn normalize(text: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Exact => text.to_string(),
        MatchMode::TrimTrailing => text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ============================================================================
// Diff
// ============================================================================

/// Line-by-line diff: ` ` common, `-` only in `expected`, `+` only in `actual`.
///
/// Returns an empty string when the inputs are identical.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {
                let _ = writeln!(out, " {e}");
            }
            (Some(e), Some(a)) => {
                let _ = writeln!(out, "-{e}");
                let _ = writeln!(out, "+{a}");
                has_diff = true;
            }
            (Some(e), None) => {
                let _ = writeln!(out, "-{e}");
                has_diff = true;
            }
            (None, Some(a)) => {
                let _ = writeln!(out, "+{a}");
                has_diff = true;
            }
            (None, None) => {}
        }
    }

    if has_diff { out } else { String::new() }
}

// ============================================================================
// Snapshot Assertion
// ============================================================================

fn snapshot_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.snap"))
}

fn is_bless() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Assert that a view's text rendering matches a stored snapshot.
///
/// # Panics
///
/// * If the snapshot file does not exist and `BLESS=1` is **not** set.
/// * If the rendering does not match the stored snapshot.
pub fn assert_view_snapshot(name: &str, view: &DialogView, base_dir: &str, mode: MatchMode) {
    let path = snapshot_path(Path::new(base_dir), name);
    let actual = view_to_text(view);

    if is_bless() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create snapshot directory");
        }
        std::fs::write(&path, &actual).expect("failed to write snapshot");
        return;
    }

    match std::fs::read_to_string(&path) {
        Ok(expected) => {
            let norm_expected = normalize(&expected, mode);
            let norm_actual = normalize(&actual, mode);
            if norm_expected != norm_actual {
                let diff = diff_text(&norm_expected, &norm_actual);
                panic!(
                    "\n\
                     === Snapshot mismatch: '{name}' ===\n\
                     File: {}\n\
                     Mode: {mode:?}\n\
                     Set BLESS=1 to update.\n\n\
                     Diff (- expected, + actual):\n{diff}",
                    path.display()
                );
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            panic!(
                "\n\
                 === No snapshot found: '{name}' ===\n\
                 Expected at: {}\n\
                 Run with BLESS=1 to create it.\n\n\
                 Actual output:\n{actual}",
                path.display(),
            );
        }
        Err(e) => panic!("Failed to read snapshot '{}': {e}", path.display()),
    }
}

/// Assert that a view matches a stored snapshot.
///
/// Uses `CARGO_MANIFEST_DIR` to locate the snapshot directory.
///
/// ```ignore
/// // Default mode: TrimTrailing
/// assert_snapshot!("dialog_initial", &view);
///
/// // Explicit mode
/// assert_snapshot!("dialog_exact", &view, MatchMode::Exact);
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $view:expr) => {
        $crate::assert_view_snapshot(
            $name,
            $view,
            env!("CARGO_MANIFEST_DIR"),
            $crate::MatchMode::TrimTrailing,
        )
    };
    ($name:expr, $view:expr, $mode:expr) => {
        $crate::assert_view_snapshot($name, $view, env!("CARGO_MANIFEST_DIR"), $mode)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropneg_core::{
        DialogConfig, DropAction, OfferSpec, RawOffer, SelectionState, ViewInputs, action_label,
    };

    fn view(selection: &SelectionState, status: Option<&str>) -> DialogView {
        let offer = OfferSpec::parse(
            &RawOffer::new()
                .with_types(["text/plain"])
                .with_actions([DropAction::COPY, DropAction::MOVE]),
        )
        .unwrap();
        DialogView::build(ViewInputs {
            offer: &offer,
            selection,
            config: &DialogConfig::default(),
            labeler: &action_label,
            status,
            chooser_open: false,
        })
    }

    #[test]
    fn renders_initial_view() {
        let text = view_to_text(&view(&SelectionState::new(), None));
        assert_eq!(
            text,
            "Drop Parameters\n\
             Data Type: (choose drop data type)\n    text/plain\n\
             [ ] Drop as file (disabled)\n\
             File Type: (choose file data type) (disabled)\n\
             [Choose file...] (disabled)\n\
             Drop Action: (choose drop action)\n    Copy\n    Move\n\
             [Cancel] [Drop]"
        );
    }

    #[test]
    fn marks_selection_and_readiness() {
        let mut selection = SelectionState::new();
        selection.on_select_type("text/plain");
        selection.on_select_action(DropAction::MOVE);
        let text = view_to_text(&view(&selection, None));
        assert!(text.contains("Data Type: text/plain\n  * text/plain"));
        assert!(text.contains("    Copy\n  * Move"));
        assert!(text.ends_with("[Cancel] [Drop] ready"));
    }

    #[test]
    fn shows_status_line() {
        let text = view_to_text(&view(&SelectionState::new(), Some("choose a drop action")));
        assert!(text.contains("\nStatus: choose a drop action\n"));
    }

    #[test]
    fn diff_text_identical() {
        assert_eq!(diff_text("A\nB", "A\nB"), "");
    }

    #[test]
    fn diff_text_changed_line() {
        let diff = diff_text("A\nB", "A\nC");
        assert!(diff.contains("-B"));
        assert!(diff.contains("+C"));
    }

    #[test]
    fn normalize_trim_trailing() {
        assert_eq!(
            normalize("hello  \n  world  \n", MatchMode::TrimTrailing),
            "hello\n  world"
        );
    }

    #[test]
    fn snapshot_path_construction() {
        assert_eq!(
            snapshot_path(Path::new("/crates/my-crate"), "dialog"),
            PathBuf::from("/crates/my-crate/tests/snapshots/dialog.snap")
        );
    }

    #[test]
    fn snapshot_match_succeeds() {
        let dir = std::env::temp_dir().join("dropneg_harness_test_match");
        let _ = std::fs::remove_dir_all(&dir);
        let v = view(&SelectionState::new(), None);
        let path = snapshot_path(&dir, "match_test");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("{}\n", view_to_text(&v))).unwrap();

        assert_view_snapshot("match_test", &v, dir.to_str().unwrap(), MatchMode::TrimTrailing);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "Snapshot mismatch")]
    fn snapshot_mismatch_panics() {
        let dir = std::env::temp_dir().join("dropneg_harness_test_mismatch");
        let _ = std::fs::remove_dir_all(&dir);
        let path = snapshot_path(&dir, "mismatch_test");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "something else").unwrap();

        assert_view_snapshot(
            "mismatch_test",
            &view(&SelectionState::new(), None),
            dir.to_str().unwrap(),
            MatchMode::Exact,
        );
    }
}
