use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Deletes fields from the hash at `key`. The key itself is removed the
/// moment its last field goes.
///
/// Ref: <https://redis.io/docs/latest/commands/hdel/>
#[derive(Debug, PartialEq)]
pub struct HDel {
    pub key: String,
    pub fields: Vec<String>,
}

impl Executable for HDel {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let removed = store.hash_del(&self.key, &self.fields)?;
        Ok(Frame::Integer(removed as i64))
    }
}

impl TryFrom<&mut CommandParser> for HDel {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        let mut fields = vec![];
        loop {
            match parser.next_string() {
                Ok(field) => fields.push(field),
                Err(CommandParserError::EndOfStream) if !fields.is_empty() => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { key, fields })
    }
}
