use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Counts the given keys that are present and unexpired. A key repeated in
/// the argument list is counted once per occurrence.
///
/// Ref: <https://redis.io/docs/latest/commands/exists/>
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub keys: Vec<String>,
}

impl Executable for Exists {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let count = store.exists(&self.keys);
        Ok(Frame::Integer(count as i64))
    }
}

impl TryFrom<&mut CommandParser> for Exists {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandParserError::EndOfStream) if !keys.is_empty() => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { keys })
    }
}
