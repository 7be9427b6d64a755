use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{format_score, CommandParser};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/zscore
#[derive(Debug, PartialEq)]
pub struct ZScore {
    pub key: String,
    pub member: String,
}

impl Executable for ZScore {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        match store.zscore(&self.key, &self.member)? {
            Some(score) => Ok(Frame::Bulk(Bytes::from(format_score(score)))),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for ZScore {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        Ok(Self { key, member })
    }
}
