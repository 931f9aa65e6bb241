// src/core/protocol/codec.rs

//! A `tokio_util::codec` implementation that splits the inbound byte stream into
//! protocol lines and encodes outbound `Response`s.

use super::{Command, Response};
use crate::core::DeckError;
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

/// Upper bound for a single inbound line. A client exceeding it is disconnected.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Line codec for the deck protocol.
///
/// Lines are split on `\n`; surrounding whitespace (including the `\r` of CRLF)
/// is trimmed and blank lines are skipped, so the decoder only ever yields
/// non-empty commands.
#[derive(Debug, Default)]
pub struct DeckCodec {
    /// How far into the buffer we've already searched for a newline.
    next_index: usize,
}

impl DeckCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for DeckCodec {
    type Item = Command;
    type Error = DeckError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');
            let Some(offset) = newline else {
                if src.len() > MAX_LINE_LENGTH {
                    return Err(DeckError::LineTooLong(MAX_LINE_LENGTH));
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let line_end = self.next_index + offset;
            self.next_index = 0;
            if line_end > MAX_LINE_LENGTH {
                return Err(DeckError::LineTooLong(MAX_LINE_LENGTH));
            }

            let line = src.split_to(line_end + 1);
            let text = String::from_utf8_lossy(&line[..line_end]);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            return Ok(Some(Command::parse(text)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(command) = self.decode(src)? {
            return Ok(Some(command));
        }

        // A final line without a terminating newline is still a command.
        self.next_index = 0;
        if src.is_empty() {
            return Ok(None);
        }
        let rest = src.split();
        let text = String::from_utf8_lossy(&rest);
        let text = text.trim();
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Command::parse(text)))
        }
    }
}

impl Encoder<Response> for DeckCodec {
    type Error = DeckError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode(dst);
        Ok(())
    }
}
