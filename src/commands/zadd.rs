use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Adds score/member pairs to the sorted set at `key`, creating it if
/// needed. Each pair counts towards the reply when the member is new or its
/// score changed; re-adding a member with its current score counts 0.
///
/// Ref: <https://redis.io/docs/latest/commands/zadd/>
#[derive(Debug, PartialEq)]
pub struct ZAdd {
    pub key: String,
    pub pairs: Vec<(f64, String)>,
}

impl Executable for ZAdd {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let mut changed = 0;
        for (score, member) in self.pairs {
            changed += store.zadd(&self.key, score, member)?;
        }
        Ok(Frame::Integer(changed))
    }
}

impl TryFrom<&mut CommandParser> for ZAdd {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;

        let mut pairs = vec![];
        loop {
            let score = match parser.next_f64() {
                Ok(score) => score,
                Err(CommandParserError::EndOfStream) if !pairs.is_empty() => break,
                Err(err) => return Err(err.into()),
            };
            let member = parser.next_string()?;
            pairs.push((score, member));
        }

        Ok(Self { key, pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::request::Request;
    use bytes::Bytes;

    fn parse(parts: &[&str]) -> Result<Command, Error> {
        Command::try_from(Request {
            parts: parts.iter().map(|s| Bytes::from(s.to_string())).collect(),
        })
    }

    #[test]
    fn parses_multiple_pairs() {
        let cmd = parse(&["ZADD", "z", "1.5", "a", "2", "b"]).unwrap();
        assert_eq!(
            cmd,
            Command::ZAdd(ZAdd {
                key: "z".to_string(),
                pairs: vec![(1.5, "a".to_string()), (2.0, "b".to_string())],
            })
        );
    }

    #[test]
    fn score_without_member_is_an_error() {
        assert!(parse(&["ZADD", "z", "1", "a", "2"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_scores() {
        let err = parse(&["ZADD", "z", "nope", "a"]).unwrap_err();
        assert_eq!(err.to_string(), "ERR value is not a valid float");
    }

    #[test]
    fn counts_new_members_and_score_changes() {
        let store = Store::new();

        let frame = ZAdd {
            key: "z".to_string(),
            pairs: vec![(1.0, "a".to_string()), (2.0, "b".to_string())],
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(2));

        // Same score counts 0, changed score counts 1.
        let frame = ZAdd {
            key: "z".to_string(),
            pairs: vec![(1.0, "a".to_string()), (5.0, "b".to_string())],
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Integer(1));
    }
}
