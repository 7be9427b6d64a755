use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Incrementally iterates the keyspace: `SCAN cursor [MATCH pattern]
/// [COUNT count]`. The reply is a paged result, a two-element array of the
/// next cursor and the page of keys; cursor 0 means the iteration is
/// complete.
///
/// Ref: <https://redis.io/docs/latest/commands/scan>
#[derive(Debug, PartialEq)]
pub struct Scan {
    pub cursor: u64,
    pub pattern: String,
    pub count: u64,
}

impl Executable for Scan {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let (next_cursor, keys) = store.scan(self.cursor, &self.pattern, self.count);
        Ok(Frame::paged(next_cursor, keys.into_iter().map(Bytes::from)))
    }
}

impl TryFrom<&mut CommandParser> for Scan {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let cursor = parser.next_cursor()?;
        let options = ScanOptions::parse(parser)?;

        Ok(Self {
            cursor,
            pattern: options.pattern,
            count: options.count,
        })
    }
}

/// The `MATCH`/`COUNT` option tail shared by the whole SCAN family. A
/// non-positive or missing COUNT is left at 0 so the store applies its
/// default page size.
pub(crate) struct ScanOptions {
    pub pattern: String,
    pub count: u64,
}

impl ScanOptions {
    pub(crate) fn parse(parser: &mut CommandParser) -> Result<ScanOptions, Error> {
        let mut pattern = "*".to_string();
        let mut count = 0u64;

        loop {
            let option = match parser.next_string() {
                Ok(option) => option.to_lowercase(),
                Err(CommandParserError::EndOfStream) => break,
                Err(err) => return Err(err.into()),
            };

            match option.as_str() {
                "match" => pattern = parser.next_string()?,
                "count" => {
                    let parsed = parser.next_i64()?;
                    count = if parsed > 0 { parsed as u64 } else { 0 };
                }
                _ => return Err(CommandParserError::Syntax.into()),
            }
        }

        Ok(ScanOptions { pattern, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::request::Request;

    fn parse(parts: &[&str]) -> Result<Command, Error> {
        Command::try_from(Request {
            parts: parts.iter().map(|s| Bytes::from(s.to_string())).collect(),
        })
    }

    #[test]
    fn cursor_only() {
        let cmd = parse(&["SCAN", "0"]).unwrap();
        assert_eq!(
            cmd,
            Command::Scan(Scan {
                cursor: 0,
                pattern: "*".to_string(),
                count: 0,
            })
        );
    }

    #[test]
    fn match_and_count_options() {
        let cmd = parse(&["SCAN", "10", "MATCH", "user:*", "COUNT", "100"]).unwrap();
        assert_eq!(
            cmd,
            Command::Scan(Scan {
                cursor: 10,
                pattern: "user:*".to_string(),
                count: 100,
            })
        );
    }

    #[test]
    fn invalid_cursor() {
        let err = parse(&["SCAN", "-1"]).unwrap_err();
        assert_eq!(err.to_string(), "ERR invalid cursor");
    }

    #[test]
    fn unknown_option_is_a_syntax_error() {
        assert!(parse(&["SCAN", "0", "BOGUS"]).is_err());
    }

    #[test]
    fn pages_through_matching_keys() {
        let store = Store::new();
        for i in 0..7 {
            store.set_string(&format!("k{}", i), Bytes::from("v"), None);
        }

        let frame = Scan {
            cursor: 0,
            pattern: "*".to_string(),
            count: 5,
        }
        .exec(&store)
        .unwrap();

        assert_eq!(
            frame,
            Frame::paged(5, (0..5).map(|i| Bytes::from(format!("k{}", i))))
        );
    }
}
