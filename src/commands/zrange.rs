use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{format_score, CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns sorted-set members between rank `start` and `stop`, both
/// inclusive, ordered by ascending score with ties broken by member.
/// Negative ranks count from the highest-ranked member. With `WITHSCORES`
/// each element becomes a `[score, member]` pair.
///
/// Ref: <https://redis.io/docs/latest/commands/zrange/>
#[derive(Debug, PartialEq)]
pub struct ZRange {
    pub key: String,
    pub start: i64,
    pub stop: i64,
    pub with_scores: bool,
}

impl Executable for ZRange {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        if self.with_scores {
            let entries = store.zrange_entries(&self.key, self.start, self.stop)?;
            let items = entries
                .into_iter()
                .map(|(member, score)| {
                    Frame::score_member(format_score(score), Bytes::from(member))
                })
                .collect();
            Ok(Frame::Array(items))
        } else {
            let members = store.zrange(&self.key, self.start, self.stop)?;
            Ok(Frame::array_of_bulks(
                members.into_iter().map(Bytes::from),
            ))
        }
    }
}

impl TryFrom<&mut CommandParser> for ZRange {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_i64()?;
        let stop = parser.next_i64()?;

        let with_scores = match parser.next_string() {
            Ok(option) if option.eq_ignore_ascii_case("withscores") => true,
            Ok(_) => return Err(CommandParserError::Syntax.into()),
            Err(CommandParserError::EndOfStream) => false,
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            key,
            start,
            stop,
            with_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Store {
        let store = Store::new();
        store.zadd("z", 2.0, "b".to_string()).unwrap();
        store.zadd("z", 1.0, "a".to_string()).unwrap();
        store.zadd("z", 1.0, "aa".to_string()).unwrap();
        store
    }

    #[test]
    fn orders_by_score_then_member() {
        let frame = ZRange {
            key: "z".to_string(),
            start: 0,
            stop: -1,
            with_scores: false,
        }
        .exec(&seeded())
        .unwrap();

        assert_eq!(
            frame,
            Frame::array_of_bulks(vec![
                Bytes::from("a"),
                Bytes::from("aa"),
                Bytes::from("b"),
            ])
        );
    }

    #[test]
    fn with_scores_pairs_score_and_member() {
        let frame = ZRange {
            key: "z".to_string(),
            start: 0,
            stop: 0,
            with_scores: true,
        }
        .exec(&seeded())
        .unwrap();

        assert_eq!(
            frame,
            Frame::Array(vec![Frame::score_member(
                "1".to_string(),
                Bytes::from("a")
            )])
        );
    }

    #[test]
    fn unknown_trailing_option_is_a_syntax_error() {
        use crate::commands::Command;
        use crate::request::Request;

        let result = Command::try_from(Request {
            parts: ["ZRANGE", "z", "0", "-1", "LIMIT"]
                .iter()
                .map(|s| Bytes::from(s.to_string()))
                .collect(),
        });
        assert!(result.is_err());
    }
}
