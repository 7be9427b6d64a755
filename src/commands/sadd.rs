use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Adds members to the set at `key`, creating it if needed. Replies with
/// the number of members that were not already present.
///
/// Ref: <https://redis.io/docs/latest/commands/sadd/>
#[derive(Debug, PartialEq)]
pub struct SAdd {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for SAdd {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let added = store.set_add(&self.key, self.members)?;
        Ok(Frame::Integer(added as i64))
    }
}

impl TryFrom<&mut CommandParser> for SAdd {
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
    fn counts_only_new_members() {
        let store = Store::new();

        let frame = SAdd {
            key: "s".to_string(),
            members: vec!["a".to_string(), "b".to_string()],
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(2));

        let frame = SAdd {
            key: "s".to_string(),
            members: vec!["b".to_string(), "c".to_string()],
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(1));
    }
}
