use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/rpush
#[derive(Debug, PartialEq)]
pub struct RPush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for RPush {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let len = store.list_rpush(&self.key, self.values)?;
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for RPush {
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
    fn appends_in_order() {
        let store = Store::new();

        RPush {
            key: "l".to_string(),
            values: vec![Bytes::from("a"), Bytes::from("b")],
        }
        .exec(&store)
        .unwrap();

        let range = store.list_range("l", 0, -1).unwrap();
        assert_eq!(range, vec![Bytes::from("a"), Bytes::from("b")]);
    }
}
