use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns every member of the set at `key` in sorted order. A missing key
/// is an empty array.
///
/// Ref: <https://redis.io/docs/latest/commands/smembers/>
#[derive(Debug, PartialEq)]
pub struct SMembers {
    pub key: String,
}

impl Executable for SMembers {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let members = store.set_members(&self.key)?;
        Ok(Frame::array_of_bulks(
            members.into_iter().map(Bytes::from),
        ))
    }
}

impl TryFrom<&mut CommandParser> for SMembers {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
