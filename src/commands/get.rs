use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the String value of `key`. A missing, expired, or non-String key all
/// read as nil; a wrong-kind GET is "not found" by contract, not an error.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        match store.get_string(&self.key) {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::request::Request;
    use bytes::Bytes;

    #[test]
    fn existing_key() {
        let frame = Request {
            parts: vec![Bytes::from("GET"), Bytes::from("key1")],
        };
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("key1")
            })
        );

        let store = Store::new();
        store.set_string("key1", Bytes::from("1"), None);

        let result = cmd.exec(&store).unwrap();
        assert_eq!(result, Frame::Bulk(Bytes::from("1")));
    }

    #[test]
    fn missing_key() {
        let store = Store::new();
        let result = Get {
            key: "nope".to_string(),
        }
        .exec(&store)
        .unwrap();

        assert_eq!(result, Frame::Null);
    }

    #[test]
    fn wrong_kind_reads_as_nil() {
        let store = Store::new();
        store.list_rpush("l", vec![Bytes::from("a")]).unwrap();

        let result = Get {
            key: "l".to_string(),
        }
        .exec(&store)
        .unwrap();

        assert_eq!(result, Frame::Null);
    }
}
