use std::io::Cursor;

use bytes::{Buf, Bytes};
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

/// Ceiling on the number of elements a multi-bulk request may declare.
pub const MAX_ARRAY_LEN: usize = 1_000_000;

/// Default ceiling on a single bulk string payload, in bytes.
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    /// The buffer ends mid-request. Not a protocol violation: the caller
    /// should wait for more bytes (or report an IO error at EOF).
    #[error("not enough data is available to parse an entire request")]
    Incomplete,
    #[error("ERR Protocol error: multibulk length {0} exceeds limit")]
    ArrayTooLarge(usize),
    #[error("ERR Protocol error: bulk string length {0} exceeds limit")]
    BulkTooLarge(usize),
    #[error("ERR Protocol error: {0}")]
    Malformed(String),
}

/// A decoded client request: the command name followed by its arguments, each
/// an arbitrary byte string. Produced from either wire form; the distinction
/// does not survive decoding.
#[derive(Debug, PartialEq)]
pub struct Request {
    pub parts: Vec<Bytes>,
}

impl Request {
    /// Parses one request out of `src`, leaving the cursor just past it.
    ///
    /// A request is either a multi-bulk array (`*<N>` header followed by N
    /// bulk strings) or an inline command (one whitespace-separated line).
    /// Blank inline lines are skipped rather than rejected, so interactive
    /// clients can send bare newlines harmlessly.
    pub fn parse(src: &mut Cursor<&[u8]>, max_bulk_len: usize) -> Result<Request, Error> {
        loop {
            if !src.has_remaining() {
                return Err(Error::Incomplete);
            }

            if src.chunk()[0] == b'*' {
                src.advance(1);
                return parse_array(src, max_bulk_len);
            }

            let parts = parse_inline(src)?;
            if !parts.is_empty() {
                return Ok(Request { parts });
            }
        }
    }
}

// *<number-of-elements>\r\n<bulk-string-1>...<bulk-string-n>
fn parse_array(src: &mut Cursor<&[u8]>, max_bulk_len: usize) -> Result<Request, Error> {
    let count = get_decimal(src)?;

    if count < 0 {
        return Err(Error::Malformed(format!(
            "negative multibulk length {}",
            count
        )));
    }
    if count as usize > MAX_ARRAY_LEN {
        return Err(Error::ArrayTooLarge(count as usize));
    }

    let mut parts = Vec::with_capacity(count as usize);
    for _ in 0..count {
        parts.push(parse_bulk(src, max_bulk_len)?);
    }

    Ok(Request { parts })
}

// $<length>\r\n<data>\r\n
fn parse_bulk(src: &mut Cursor<&[u8]>, max_bulk_len: usize) -> Result<Bytes, Error> {
    match get_byte(src)? {
        b'$' => {}
        byte => {
            return Err(Error::Malformed(format!(
                "expected '$', got '{}'",
                byte as char
            )))
        }
    }

    let length = get_decimal(src)?;

    // A null bulk string decodes to an empty argument, not an error.
    if length == -1 {
        return Ok(Bytes::new());
    }
    if length < -1 {
        return Err(Error::Malformed(format!("invalid bulk length {}", length)));
    }

    let length = length as usize;
    if length > max_bulk_len {
        return Err(Error::BulkTooLarge(length));
    }

    // Payload plus its trailing CRLF must be fully buffered before we commit.
    if src.remaining() < length + CRLF.len() {
        return Err(Error::Incomplete);
    }

    let start = src.position() as usize;
    let data = &src.get_ref()[start..start + length];
    let terminator = &src.get_ref()[start + length..start + length + CRLF.len()];
    if terminator != CRLF {
        return Err(Error::Malformed(
            "bulk string missing CRLF terminator".to_string(),
        ));
    }

    let data = Bytes::copy_from_slice(data);
    src.advance(length + CRLF.len());

    Ok(data)
}

// A single line of whitespace-separated tokens, terminated by LF (an optional
// preceding CR is stripped). Yields no tokens for a blank line.
fn parse_inline(src: &mut Cursor<&[u8]>) -> Result<Vec<Bytes>, Error> {
    let start = src.position() as usize;
    let buf = &src.get_ref()[start..];

    let newline = buf
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(Error::Incomplete)?;

    let mut line = &buf[..newline];
    if line.ends_with(b"\r") {
        line = &line[..line.len() - 1];
    }

    let parts = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(Bytes::copy_from_slice)
        .collect();

    src.advance(newline + 1);
    Ok(parts)
}

// A CRLF-terminated header line interpreted as a decimal integer.
fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;
    let digits = std::str::from_utf8(line)
        .map_err(|_| Error::Malformed("invalid length header".to_string()))?;
    digits
        .parse::<i64>()
        .map_err(|_| Error::Malformed(format!("invalid length header '{}'", digits)))
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    let line_end = src.get_ref()[start..end]
        .windows(CRLF.len())
        .position(|window| window == CRLF)
        .ok_or(Error::Incomplete)
        .map(|index| start + index)?;

    src.set_position((line_end + CRLF.len()) as u64);

    Ok(&src.get_ref()[start..line_end])
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}
