#![forbid(unsafe_code)]

//! Terminal demo for the drop negotiation dialog.
//!
//! The binary reads an offer, shows the dialog in the terminal through
//! [`terminal::TerminalFrontend`], and prints the outcome as JSON.

pub mod cli;
pub mod navigation;
pub mod render;
pub mod sample;
pub mod terminal;
