use std::io::Cursor;

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::Frame;
use crate::request::{self, Request, DEFAULT_MAX_BULK_LEN};
use crate::Error;

/// Framing codec for one connection: decodes inbound bytes into [`Request`]s
/// and encodes [`Frame`] replies back out.
///
/// Decoding is stateless per request. The parser runs over a cursor and the
/// read buffer is only advanced once a full request has been parsed, so a
/// partial request is simply retried when more bytes arrive. EOF in the
/// middle of a request surfaces through `decode_eof` as an IO error, distinct
/// from a malformed-but-complete request.
pub struct Codec {
    max_bulk_len: usize,
}

/// One decoder yield. A protocol violation is scoped to the single request
/// that caused it, so it is reported in-band rather than as a decoder error
/// (which would tear down the framed stream); the connection replies with an
/// error and keeps reading.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    Request(Request),
    ProtocolError(request::Error),
}

impl Codec {
    pub fn new() -> Codec {
        Codec {
            max_bulk_len: DEFAULT_MAX_BULK_LEN,
        }
    }

    /// Lowers the bulk string payload ceiling, mainly to bound memory use in
    /// constrained deployments and tests.
    pub fn with_max_bulk_len(max_bulk_len: usize) -> Codec {
        Codec { max_bulk_len }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Codec {
    type Item = Inbound;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut cursor = Cursor::new(&src[..]);

        let inbound = match Request::parse(&mut cursor, self.max_bulk_len) {
            Ok(request) => Inbound::Request(request),
            // Not enough data to parse an entire request yet.
            Err(request::Error::Incomplete) => return Ok(None),
            Err(err) => Inbound::ProtocolError(err),
        };

        // Remove the consumed bytes from the buffer. On a violation the
        // parser stops having consumed at least the offending header, so the
        // next decode resumes from there.
        let position = cursor.position() as usize;
        src.advance(position);

        Ok(Some(inbound))
    }
}

impl Encoder<Frame> for Codec {
    type Error = Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&frame.serialize());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn decode_request(codec: &mut Codec, buf: &mut BytesMut) -> Request {
        match codec.decode(buf).unwrap().unwrap() {
            Inbound::Request(request) => request,
            Inbound::ProtocolError(err) => panic!("unexpected protocol error: {}", err),
        }
    }

    #[test]
    fn decode_waits_for_complete_request() {
        let mut codec = Codec::new();
        let mut buf = BytesMut::from(&b"*2\r\n$4\r\nECHO\r\n$2\r\nhi"[..]);

        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\r\n");
        let request = decode_request(&mut codec, &mut buf);
        assert_eq!(request.parts, vec![Bytes::from("ECHO"), Bytes::from("hi")]);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_leaves_following_request_in_buffer() {
        let mut codec = Codec::new();
        let mut buf = BytesMut::from(&b"*1\r\n$4\r\nPING\r\n*1\r\n$5\r\nHELLO\r\n"[..]);

        let first = decode_request(&mut codec, &mut buf);
        assert_eq!(first.parts, vec![Bytes::from("PING")]);
        assert_eq!(&buf[..], b"*1\r\n$5\r\nHELLO\r\n");
    }

    #[test]
    fn decode_reports_protocol_errors_in_band() {
        let mut codec = Codec::with_max_bulk_len(8);
        let mut buf = BytesMut::from(&b"*1\r\n$100\r\n"[..]);

        let inbound = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(
            inbound,
            Inbound::ProtocolError(request::Error::BulkTooLarge(100))
        );
    }

    #[test]
    fn decode_resumes_after_a_protocol_error() {
        let mut codec = Codec::new();
        let mut buf = BytesMut::from(&b"*abc\r\n*1\r\n$4\r\nPING\r\n"[..]);

        let inbound = codec.decode(&mut buf).unwrap().unwrap();
        assert!(matches!(inbound, Inbound::ProtocolError(_)));

        // The violating bytes were consumed; the next request decodes cleanly.
        let request = decode_request(&mut codec, &mut buf);
        assert_eq!(request.parts, vec![Bytes::from("PING")]);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_serializes_reply() {
        let mut codec = Codec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(Frame::Simple("PONG".to_string()), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"+PONG\r\n");
    }
}
