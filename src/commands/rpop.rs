use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/rpop
#[derive(Debug, PartialEq)]
pub struct RPop {
    pub key: String,
}

impl Executable for RPop {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        match store.list_rpop(&self.key)? {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for RPop {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn pops_from_the_tail_until_empty() {
        let store = Store::new();
        store
            .list_rpush("l", vec![Bytes::from("a"), Bytes::from("b")])
            .unwrap();

        let frame = RPop {
            key: "l".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Bulk(Bytes::from("b")));

        let frame = RPop {
            key: "l".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Bulk(Bytes::from("a")));

        let frame = RPop {
            key: "l".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Null);
    }
}
