use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Sets `field` in the hash at `key`, creating the hash if needed. Replies
/// 1 when the field is new, 0 when it was updated.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct HSet {
    pub key: String,
    pub field: String,
    pub value: Bytes,
}

impl Executable for HSet {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let added = store.hash_set(&self.key, self.field, self.value)?;
        Ok(Frame::Integer(added))
    }
}

impl TryFrom<&mut CommandParser> for HSet {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_then_update() {
        let store = Store::new();

        let frame = HSet {
            key: "h".to_string(),
            field: "f".to_string(),
            value: Bytes::from("1"),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(1));

        let frame = HSet {
            key: "h".to_string(),
            field: "f".to_string(),
            value: Bytes::from("2"),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(0));
    }

    #[test]
    fn wrong_kind_errors() {
        let store = Store::new();
        store.set_string("k", Bytes::from("v"), None);

        let result = HSet {
            key: "k".to_string(),
            field: "f".to_string(),
            value: Bytes::from("1"),
        }
        .exec(&store);
        assert!(result.is_err());
    }
}
