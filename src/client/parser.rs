//! Incremental frame parser for the event-stream wire format.
//!
//! Bytes arrive from the connection in arbitrary chunks; a frame boundary
//! may fall anywhere inside a chunk or across two of them. [`FrameParser`]
//! buffers input with [`feed`](FrameParser::feed) and yields one [`Frame`]
//! per complete non-blank line through [`next_frame`](FrameParser::next_frame).
//!
//! # Examples
//!
//! ```
//! use firetree::FrameParser;
//!
//! let mut parser = FrameParser::new();
//! parser.feed(b"event: patch\ndata: {\"a\"");
//!
//! let frame = parser.next_frame().unwrap().unwrap();
//! assert_eq!((frame.key.as_str(), frame.value.as_str()), ("event", "patch"));
//! // the data line is still incomplete
//! assert!(parser.next_frame().unwrap().is_none());
//!
//! parser.feed(b": 1}\n");
//! let frame = parser.next_frame().unwrap().unwrap();
//! assert_eq!(frame.value, "{\"a\": 1}");
//! ```

use bytes::BytesMut;

use crate::error::Result;
use crate::protocol::FRAME_SEPARATOR;

/// One `key: value` line parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text before the first `": "`, or the whole line when there is no
    /// separator.
    pub key: String,
    /// Text after the first `": "`, empty when there is no separator.
    pub value: String,
}

/// Incremental line framer.
///
/// `feed` appends a chunk to the internal buffer; `next_frame` drains one
/// completed line at a time, leaving a partial trailing line buffered for
/// the next chunk. Lines are trimmed of surrounding whitespace (which also
/// absorbs the `\r` of CRLF endings); blank lines are event separators on
/// the wire and are skipped rather than framed.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: BytesMut,
}

impl FrameParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        FrameParser {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Append a chunk of raw bytes to the buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pull the next complete frame out of the buffer, in arrival order.
    ///
    /// Returns `Ok(None)` when no complete non-blank line is buffered.
    /// Fails when a completed line is not valid UTF-8.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let text = std::str::from_utf8(&line[..pos])?.trim();
            if text.is_empty() {
                continue;
            }
            return Ok(Some(parse_frame(text)));
        }
        Ok(None)
    }

    /// Flush the buffer once the connection has closed, framing a final
    /// unterminated line if one is pending.
    pub fn finish(&mut self) -> Result<Option<Frame>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let line = self.buffer.split();
        let text = std::str::from_utf8(&line)?.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_frame(text)))
    }
}

fn parse_frame(line: &str) -> Frame {
    match line.split_once(FRAME_SEPARATOR) {
        Some((key, value)) => Frame {
            key: key.to_string(),
            value: value.to_string(),
        },
        None => Frame {
            key: line.to_string(),
            value: String::new(),
        },
    }
}
