#![warn(clippy::all, rust_2018_idioms)]

#[macro_use]
extern crate tracing;

mod app;
pub use app::LinesceneApp;

pub mod panic_dialog;

mod render;

/// Removes ANSI escape sequences (colors, cursor movement) from `s`
pub fn strip_ansi_codes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }

        if chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates up to the final byte (0x40..=0x7e)
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
    }

    out
}
