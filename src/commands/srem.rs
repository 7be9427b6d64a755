use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/srem
#[derive(Debug, PartialEq)]
pub struct SRem {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for SRem {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let removed = store.set_remove(&self.key, &self.members)?;
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for SRem {
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
        store.set_add("s", vec!["a".to_string()]).unwrap();

        let frame = SRem {
            key: "s".to_string(),
            members: vec!["a".to_string(), "missing".to_string()],
        }
        .exec(&store)
        .unwrap();

        assert_eq!(frame, Frame::Integer(1));
        assert_eq!(store.exists(&["s".to_string()]), 0);
    }
}
