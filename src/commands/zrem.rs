use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/zrem
#[derive(Debug, PartialEq)]
pub struct ZRem {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for ZRem {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let removed = store.zrem(&self.key, &self.members)?;
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for ZRem {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        let mut members = vec![];
        loop {
            match parser.next_string() {
                Ok(member) => members.push(member),
                Err(CommandParserError::EndOfStream) if !members.is_empty() => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { key, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_the_last_member_deletes_the_key() {
        let store = Store::new();
        store.zadd("z", 1.0, "a".to_string()).unwrap();

        let frame = ZRem {
            key: "z".to_string(),
            members: vec!["a".to_string(), "missing".to_string()],
        }
        .exec(&store)
        .unwrap();

        assert_eq!(frame, Frame::Integer(1));
        assert_eq!(store.exists(&["z".to_string()]), 0);
    }
}
