// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::Bytes;

static CRLF: &[u8; 2] = b"\r\n";

/// The reply model. Every response the server produces is one of these five
/// primitive shapes, or an `Array` composed of them (the paged scan result and
/// the score/member pair are both plain arrays on the wire).
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// An array of bulk strings, the shape used for KEYS, LRANGE, SMEMBERS
    /// and friends.
    pub fn array_of_bulks<I, B>(items: I) -> Frame
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Frame::Array(items.into_iter().map(|b| Frame::Bulk(b.into())).collect())
    }

    /// The paged result returned by the SCAN family: a two-element array of
    /// the next cursor (as a bulk string) and the page of elements.
    pub fn paged<I, B>(next_cursor: u64, items: I) -> Frame
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Frame::Array(vec![
            Frame::Bulk(Bytes::from(next_cursor.to_string())),
            Frame::array_of_bulks(items),
        ])
    }

    /// A sorted-set entry carrying its score: `[score, member]`.
    pub fn score_member(score: String, member: Bytes) -> Frame {
        Frame::Array(vec![Frame::Bulk(Bytes::from(score)), Frame::Bulk(member)])
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'+');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(b'-');
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let digits = i.to_string();
                let mut bytes = Vec::with_capacity(1 + digits.len() + CRLF.len());
                bytes.push(b':');
                bytes.extend_from_slice(digits.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(data) => {
                let length_str = data.len().to_string();
                let mut bytes = Vec::with_capacity(
                    1 + length_str.len() + CRLF.len() + data.len() + CRLF.len(),
                );
                bytes.push(b'$');
                bytes.extend_from_slice(length_str.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(CRLF);
                bytes
            }
            // RESP2 null bulk string.
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::Array(arr) => {
                let length_str = arr.len().to_string();
                let mut bytes = Vec::with_capacity(1 + length_str.len() + CRLF.len());
                bytes.push(b'*');
                bytes.extend_from_slice(length_str.as_bytes());
                bytes.extend_from_slice(CRLF);
                for frame in arr {
                    bytes.extend(frame.serialize());
                }
                bytes
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(arr) => {
                write!(f, "*{}", arr.len())?;
                for frame in arr {
                    write!(f, " {}", frame)?;
                }
                Ok(())
            }
        }
    }
}
