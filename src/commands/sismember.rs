use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

// https://redis.io/docs/latest/commands/sismember
#[derive(Debug, PartialEq)]
pub struct SIsMember {
    pub key: String,
    pub member: String,
}

impl Executable for SIsMember {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let present = store.set_is_member(&self.key, &self.member)?;
        Ok(Frame::Integer(present as i64))
    }
}

impl TryFrom<&mut CommandParser> for SIsMember {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        Ok(Self { key, member })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_checks() {
        let store = Store::new();
        store.set_add("s", vec!["a".to_string()]).unwrap();

        let frame = SIsMember {
            key: "s".to_string(),
            member: "a".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(1));

        let frame = SIsMember {
            key: "s".to_string(),
            member: "b".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(0));

        let frame = SIsMember {
            key: "missing".to_string(),
            member: "a".to_string(),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(0));
    }
}
