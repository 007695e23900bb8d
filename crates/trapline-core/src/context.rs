//! Source context reader.
//!
//! Reconstructs a bounded window of source lines around a stack-frame
//! location for human-readable diagnostics. An unreadable file is a normal,
//! silent condition here: trace building must never fail because source is
//! missing, moved, or unreadable.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// Number of lines collected on each side of the target line.
pub const CONTEXT_WINDOW: u32 = 5;

/// Maximum characters kept per collected line before the `...` marker.
pub const MAX_CONTEXT_LINE_LEN: usize = 300;

/// Total bytes read per file. Bounds memory and I/O on unusual file systems
/// where a read may otherwise stall or never terminate.
const MAX_SCAN_BYTES: u64 = 512 * 1024;

/// Window of source lines surrounding one stack-frame location.
///
/// `context` is `None` only when the file could not be opened. For a
/// readable file it holds the collected lines (possibly empty when the file
/// ends before the window starts), and `first_line_index` is the 1-based
/// index of the first collected line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    pub context: Option<Vec<String>>,
    pub first_line_index: Option<u32>,
}

/// Reads the context window around `line` (1-based) in `path`.
pub fn read_context(path: &str, line: u32) -> SourceContext {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!(path, %err, "source context unavailable");
            return SourceContext::default();
        }
    };

    let mut reader = BufReader::new(file).take(MAX_SCAN_BYTES);
    let window_start = line.saturating_sub(CONTEXT_WINDOW);
    let window_end = line.saturating_add(CONTEXT_WINDOW);

    let mut collected = Vec::new();
    let mut first_line_index = None;
    let mut buf = Vec::new();
    let mut index: u32 = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(path, %err, "source context read failed");
                break;
            }
        }

        index += 1;
        if index > window_end {
            break;
        }
        if index < window_start {
            continue;
        }

        first_line_index.get_or_insert(index);
        collected.push(clip_line(&buf));
    }

    SourceContext {
        context: Some(collected),
        first_line_index,
    }
}

/// Strips trailing newline characters and caps the line length with a
/// visible continuation marker.
fn clip_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(['\r', '\n']);
    match text.char_indices().nth(MAX_CONTEXT_LINE_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
