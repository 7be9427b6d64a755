use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Removes and returns the head of the list at `key`; nil when the key is
/// missing. Popping the last element deletes the key.
///
/// Ref: <https://redis.io/docs/latest/commands/lpop/>
#[derive(Debug, PartialEq)]
pub struct LPop {
    pub key: String,
}

impl Executable for LPop {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        match store.list_lpop(&self.key)? {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for LPop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
