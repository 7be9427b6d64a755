use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Raw entry count, which may include expired entries the sweep has not
/// removed yet.
///
/// Ref: <https://redis.io/docs/latest/commands/dbsize/>
#[derive(Debug, PartialEq)]
pub struct DbSize;

impl Executable for DbSize {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        Ok(Frame::Integer(store.size() as i64))
    }
}

impl TryFrom<&mut CommandParser> for DbSize {
    type Error = Error;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
