use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::scan::ScanOptions;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/sscan
#[derive(Debug, PartialEq)]
pub struct SScan {
    pub key: String,
    pub cursor: u64,
    pub pattern: String,
    pub count: u64,
}

impl Executable for SScan {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let (next_cursor, members) =
            store.set_scan(&self.key, self.cursor, &self.pattern, self.count)?;
        Ok(Frame::paged(
            next_cursor,
            members.into_iter().map(Bytes::from),
        ))
    }
}

impl TryFrom<&mut CommandParser> for SScan {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let cursor = parser.next_cursor()?;
        let options = ScanOptions::parse(parser)?;

        Ok(Self {
            key,
            cursor,
            pattern: options.pattern,
            count: options.count,
        })
    }
}
