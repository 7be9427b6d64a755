use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns all unexpired keys matching a glob pattern (`*`, `?`, `[...]`,
/// `[^...]`), sorted.
///
/// Ref: <https://redis.io/docs/latest/commands/keys/>
#[derive(Debug, PartialEq)]
pub struct Keys {
    pub pattern: String,
}

impl Executable for Keys {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let keys = store.keys(&self.pattern);
        Ok(Frame::array_of_bulks(keys.into_iter().map(Bytes::from)))
    }
}

impl TryFrom<&mut CommandParser> for Keys {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let pattern = parser.next_string()?;
        Ok(Self { pattern })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_glob_pattern() {
        let store = Store::new();
        store.set_string("user:1", Bytes::from("a"), None);
        store.set_string("user:2", Bytes::from("b"), None);
        store.set_string("other", Bytes::from("c"), None);

        let frame = Keys {
            pattern: "user:*".to_string(),
        }
        .exec(&store)
        .unwrap();

        assert_eq!(
            frame,
            Frame::array_of_bulks(vec![Bytes::from("user:1"), Bytes::from("user:2")])
        );
    }

    #[test]
    fn no_matches_is_an_empty_array() {
        let store = Store::new();
        let frame = Keys {
            pattern: "nope*".to_string(),
        }
        .exec(&store)
        .unwrap();

        assert_eq!(frame, Frame::Array(vec![]));
    }
}
