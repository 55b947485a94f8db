#![forbid(unsafe_code)]

//! Terminal rendering of the dialog.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use dropneg_core::{Control, DialogView};

use crate::navigation::Focus;

const KEY_HELP: &str = "Tab/Shift-Tab move  Left/Right choose  Enter activate  Esc cancel";

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Title,
    Focused,
    Disabled,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

fn control_text(control: &Control<'_>) -> String {
    match control {
        Control::Menu(menu) => format!("{}:  < {} >", menu.label, menu.display_text()),
        Control::Checkbox(checkbox) => {
            let mark = if checkbox.checked { 'x' } else { ' ' };
            format!("[{mark}] {}", checkbox.label)
        }
        Control::Button(button) => format!("[ {} ]", button.label),
    }
}

/// Lay the dialog out as lines, one control per line in tab order.
pub fn layout(view: &DialogView, focus: Focus) -> Vec<Line> {
    let mut lines = vec![Line::new(&view.title, LineStyle::Title)];
    if let Some(subtitle) = &view.subtitle {
        lines.push(Line::new(format!("\"{subtitle}\""), LineStyle::Plain));
    }
    lines.push(Line::new("", LineStyle::Plain));

    for (index, control) in view.controls().iter().enumerate() {
        let style = if !control.enabled() {
            LineStyle::Disabled
        } else if index == focus.index() {
            LineStyle::Focused
        } else {
            LineStyle::Plain
        };
        let mut text = control_text(control);
        if let Control::Button(button) = control
            && std::ptr::eq(*button, &view.choose_file)
            && let Some(destination) = &view.destination
        {
            text.push_str(&format!("  -> {}", destination.display()));
        }
        if let Control::Button(button) = control
            && std::ptr::eq(*button, &view.confirm)
            && view.ready
        {
            text.push_str("  (ready)");
        }
        lines.push(Line::new(text, style));
    }

    lines.push(Line::new("", LineStyle::Plain));
    if view.chooser_open {
        lines.push(Line::new("Choosing a file...", LineStyle::Hint));
    }
    if let Some(status) = &view.status {
        lines.push(Line::new(status, LineStyle::Hint));
    }
    lines.push(Line::new(KEY_HELP, LineStyle::Hint));
    lines
}

/// Draw `lines` from the top-left corner.
pub fn draw(out: &mut impl Write, lines: &[Line]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(1, row))?;
        match line.style {
            LineStyle::Plain => queue!(out, Print(&line.text))?,
            LineStyle::Title => queue!(
                out,
                SetAttribute(Attribute::Bold),
                Print(&line.text),
                SetAttribute(Attribute::Reset)
            )?,
            LineStyle::Focused => queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(&line.text),
                SetAttribute(Attribute::Reset)
            )?,
            LineStyle::Disabled | LineStyle::Hint => queue!(
                out,
                SetAttribute(Attribute::Dim),
                Print(&line.text),
                SetAttribute(Attribute::Reset)
            )?,
        }
    }
    out.flush()
}
