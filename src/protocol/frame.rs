// src/protocol/frame.rs
// Framing of the wire protocol: each command travels as `*fields#` with
// comma-separated fields. Several frames may be concatenated in one read.

use crate::constants::{FRAME_END, FRAME_START};

/// Wrap a command body in the frame delimiters.
pub fn make_frame(body: &str) -> String {
    format!("{}{}{}", FRAME_START, body, FRAME_END)
}

/// Split one raw read into individual command bodies.
///
/// The scan works on bytes: ASCII control characters are stripped and both
/// delimiters act as command boundaries, so `*A#*B#` yields two commands,
/// while the wrapper stays optional: bare text before, between or instead
/// of wrapped frames is kept as a command of its own, and an unterminated
/// `*...` run is taken through end of input. Bytes above 0x7F pass through
/// untouched, so UTF-8 payloads survive intact. Empty commands are never
/// produced, so callers can index the keyword safely.
pub fn split_frames(raw: &[u8]) -> Vec<String> {
    const START: u8 = FRAME_START as u8;
    const END: u8 = FRAME_END as u8;

    let mut commands = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    let mut flush = |current: &mut Vec<u8>, commands: &mut Vec<String>| {
        let text = String::from_utf8_lossy(current);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            commands.push(trimmed.to_string());
        }
        current.clear();
    };

    for &b in raw {
        if b.is_ascii_control() {
            continue;
        }
        if b == START || b == END {
            flush(&mut current, &mut commands);
        } else {
            current.push(b);
        }
    }
    flush(&mut current, &mut commands);
    commands
}
