//! Stack trace builder.
//!
//! Assembles the ordered frame sequence for one captured error: a synthetic
//! frame for the error site first, then any host-supplied caller frames
//! innermost to outermost, each enriched with surrounding source context.

use serde::Serialize;
use serde_json::Value;

use crate::context::{read_context, SourceContext};
use crate::normalize::{coerce_line, coerce_string, NormalizedError, RawFrame};

/// One normalized stack frame as it appears on the wire.
///
/// `args` is always empty: call-argument collection is deliberately omitted
/// so argument data can never leak into an event. The key stays on the wire
/// for payload compatibility.
#[derive(Debug, Clone, Serialize)]
pub struct StackFrame {
    pub line: u32,
    pub file_name: String,
    pub method_name: String,
    pub args: Vec<Value>,
    pub context: Option<Vec<String>>,
    pub first_line_index: Option<u32>,
}

/// Builds the frame sequence for a normalized error.
///
/// Frame 0 is always the error site taken from the normalized error, with an
/// empty function name. Supplied frames follow in their original order; an
/// absent trace yields the synthetic frame alone.
pub fn build_trace(error: &NormalizedError, raw_trace: Option<&[RawFrame]>) -> Vec<StackFrame> {
    let supplied = raw_trace.unwrap_or_default();

    let mut frames = Vec::with_capacity(supplied.len() + 1);
    frames.push(make_frame(error.file.clone(), error.line, String::new()));

    for raw in supplied {
        frames.push(make_frame(
            coerce_string(raw.file.clone()),
            coerce_line(raw.line.clone()),
            coerce_string(raw.function.clone()),
        ));
    }

    frames
}

fn make_frame(file: String, line: u32, function: String) -> StackFrame {
    let SourceContext {
        context,
        first_line_index,
    } = read_context(&file, line);

    StackFrame {
        line,
        file_name: file,
        method_name: function,
        args: Vec::new(),
        context,
        first_line_index,
    }
}
