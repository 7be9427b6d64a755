use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::scan::ScanOptions;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Incrementally iterates the fields of the hash at `key`. Each page
/// interleaves field and value: `[field1, value1, field2, value2, ...]`.
///
/// Ref: <https://redis.io/docs/latest/commands/hscan>
#[derive(Debug, PartialEq)]
pub struct HScan {
    pub key: String,
    pub cursor: u64,
    pub pattern: String,
    pub count: u64,
}

impl Executable for HScan {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let (next_cursor, pairs) =
            store.hash_scan(&self.key, self.cursor, &self.pattern, self.count)?;

        let mut items = Vec::with_capacity(pairs.len() * 2);
        for (field, value) in pairs {
            items.push(Bytes::from(field));
            items.push(value);
        }
        Ok(Frame::paged(next_cursor, items))
    }
}

impl TryFrom<&mut CommandParser> for HScan {
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
