use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns every field and value of the hash at `key` as a flat array,
/// fields sorted for deterministic output. A missing key is an empty array.
///
/// Ref: <https://redis.io/docs/latest/commands/hgetall/>
#[derive(Debug, PartialEq)]
pub struct HGetAll {
    pub key: String,
}

impl Executable for HGetAll {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let hash = store.hash_get_all(&self.key)?;

        let mut fields: Vec<String> = hash.keys().cloned().collect();
        fields.sort();

        let mut items = Vec::with_capacity(fields.len() * 2);
        for field in fields {
            let value = hash[&field].clone();
            items.push(Bytes::from(field));
            items.push(value);
        }
        Ok(Frame::array_of_bulks(items))
    }
}

impl TryFrom<&mut CommandParser> for HGetAll {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
