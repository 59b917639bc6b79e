//! Newline-delimited framing for the game connection.
//!
//! The target protocol has no length prefixes and no structured framing:
//! the server emits text lines, and commands are text lines. Decoding is
//! deliberately forgiving because server output is opaque to the fuzzer.
//! Lines may carry ANSI markup or stray non-UTF-8 bytes, so they pass
//! through a lossy UTF-8 conversion with any trailing carriage return
//! stripped. Encoding appends the newline terminator, so callers never
//! embed one.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::SessionError;

/// Longest server line the codec will buffer before declaring the stream
/// corrupt. Matches the server's own output buffer size.
pub const MAX_LINE_LEN: usize = 8192;

/// Frames the raw byte stream into text lines.
#[derive(Clone, Debug, Default)]
pub struct LineCodec {
    /// Offset up to which the buffer has already been scanned for `\n`,
    /// so repeated partial reads do not rescan from the start.
    next_index: usize,
}

impl LineCodec {
    /// Create a codec with an empty scan state.
    pub fn new() -> Self {
        Self::default()
    }
}

fn freeze_line(mut line: BytesMut) -> String {
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
    String::from_utf8_lossy(&line).into_owned()
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = SessionError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, SessionError> {
        // Never look for the terminator past the length cap: a line longer
        // than MAX_LINE_LEN is fatal whether or not its `\n` has arrived.
        let read_to = src.len().min(MAX_LINE_LEN + 1);
        if let Some(offset) = src[self.next_index..read_to].iter().position(|b| *b == b'\n') {
            let end = self.next_index + offset;
            self.next_index = 0;
            let mut line = src.split_to(end + 1);
            line.truncate(line.len() - 1);
            return Ok(Some(freeze_line(line)));
        }
        if src.len() > MAX_LINE_LEN {
            return Err(SessionError::LineTooLong(src.len()));
        }
        self.next_index = src.len();
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, SessionError> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                // Unterminated final fragment before the close; surface it
                // so nothing the server said is missing from the transcript.
                self.next_index = 0;
                let line = src.split_to(src.len());
                Ok(Some(freeze_line(line)))
            }
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = SessionError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<(), SessionError> {
        let line = line.as_ref();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
