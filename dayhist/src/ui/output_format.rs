// dayhist/src/ui/output_format.rs
//! Formatting helpers for status messages printed to stderr.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use super::theme::{color_for, ThemeEntry, ThemeMap};

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    theme: &ThemeMap,
    entry: ThemeEntry,
    use_color: bool,
) -> io::Result<()> {
    if use_color {
        writeln!(writer, "{} {}", prefix.color(color_for(theme, entry)).bold(), msg)
    } else {
        writeln!(writer, "{} {}", prefix, msg)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, use_color: bool) -> io::Result<()> {
    print_message(writer, "INFO:", msg, theme, ThemeEntry::Info, use_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, use_color: bool) -> io::Result<()> {
    print_message(writer, "WARN:", msg, theme, ThemeEntry::Warn, use_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, use_color: bool) -> io::Result<()> {
    print_message(writer, "ERROR:", msg, theme, ThemeEntry::Error, use_color)
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let color = io::stderr().is_terminal();
    let _ = print_info_message(&mut io::stderr(), msg.as_ref(), theme, color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let color = io::stderr().is_terminal();
    let _ = print_warn_message(&mut io::stderr(), msg.as_ref(), theme, color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let color = io::stderr().is_terminal();
    let _ = print_error_message(&mut io::stderr(), msg.as_ref(), theme, color);
}
