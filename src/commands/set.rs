use bytes::Bytes;
use tokio::time::Duration;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Set `key` to a String value, unconditionally replacing whatever was there.
/// `EX seconds` / `PX milliseconds` attach a time-to-live, converted to an
/// absolute expiry at write time.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub ttl: Option<Duration>,
}

impl Executable for Set {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        store.set_string(&self.key, self.value, self.ttl);
        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        let mut ttl = None;
        loop {
            let option = match parser.next_string() {
                Ok(option) => option.to_lowercase(),
                Err(CommandParserError::EndOfStream) => break,
                Err(err) => return Err(err.into()),
            };

            match option.as_str() {
                "ex" => {
                    let seconds = parser.next_i64()?;
                    if seconds <= 0 {
                        return Err("ERR invalid expire time in 'set' command".into());
                    }
                    ttl = Some(Duration::from_secs(seconds as u64));
                }
                "px" => {
                    let millis = parser.next_i64()?;
                    if millis <= 0 {
                        return Err("ERR invalid expire time in 'set' command".into());
                    }
                    ttl = Some(Duration::from_millis(millis as u64));
                }
                _ => return Err(CommandParserError::Syntax.into()),
            }
        }

        Ok(Self { key, value, ttl })
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
    fn plain_set() {
        let cmd = parse(&["SET", "foo", "baz"]).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: None,
            })
        );
    }

    #[test]
    fn set_with_px_ttl() {
        let cmd = parse(&["SET", "foo", "baz", "PX", "150"]).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: Some(Duration::from_millis(150)),
            })
        );
    }

    #[test]
    fn set_with_ex_ttl() {
        let cmd = parse(&["SET", "foo", "baz", "EX", "2"]).unwrap();
        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
                ttl: Some(Duration::from_secs(2)),
            })
        );
    }

    #[test]
    fn unknown_option_is_a_syntax_error() {
        assert!(parse(&["SET", "foo", "baz", "NX"]).is_err());
    }

    #[test]
    fn non_positive_expiry_is_rejected() {
        assert!(parse(&["SET", "foo", "baz", "EX", "0"]).is_err());
        assert!(parse(&["SET", "foo", "baz", "PX", "-5"]).is_err());
    }
}
