use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Prepends one or more values to the list at `key`, creating it if needed.
/// Values are inserted one at a time, so `LPUSH k a b c` leaves the list as
/// `[c, b, a]`. Replies with the list length after the push.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct LPush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for LPush {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let len = store.list_lpush(&self.key, self.values)?;
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for LPush {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        let mut values = vec![];
        loop {
            match parser.next_bytes() {
                Ok(value) => values.push(value),
                Err(CommandParserError::EndOfStream) if !values.is_empty() => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { key, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_insertion_order() {
        let store = Store::new();

        let frame = LPush {
            key: "l".to_string(),
            values: vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(3));

        let range = store.list_range("l", 0, -1).unwrap();
        assert_eq!(
            range,
            vec![Bytes::from("c"), Bytes::from("b"), Bytes::from("a")]
        );
    }
}
