use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the elements of the list at `key` between `start` and `stop`,
/// both inclusive. Negative indices count from the tail, `-1` being the
/// last element; out-of-range indices are clamped rather than erroring.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct LRange {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl Executable for LRange {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        let values = store.list_range(&self.key, self.start, self.stop)?;
        Ok(Frame::array_of_bulks(values))
    }
}

impl TryFrom<&mut CommandParser> for LRange {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_i64()?;
        let stop = parser.next_i64()?;

        Ok(Self { key, start, stop })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn seeded() -> Store {
        let store = Store::new();
        store
            .list_rpush(
                "l",
                vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
            )
            .unwrap();
        store
    }

    #[test]
    fn negative_indices_count_from_the_tail() {
        let frame = LRange {
            key: "l".to_string(),
            start: 0,
            stop: -1,
        }
        .exec(&seeded())
        .unwrap();

        assert_eq!(
            frame,
            Frame::array_of_bulks(vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")])
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        let frame = LRange {
            key: "l".to_string(),
            start: 2,
            stop: 1,
        }
        .exec(&seeded())
        .unwrap();

        assert_eq!(frame, Frame::Array(vec![]));
    }

    #[test]
    fn stop_is_clamped_to_the_list_end() {
        let frame = LRange {
            key: "l".to_string(),
            start: 1,
            stop: 100,
        }
        .exec(&seeded())
        .unwrap();

        assert_eq!(
            frame,
            Frame::array_of_bulks(vec![Bytes::from("b"), Bytes::from("c")])
        );
    }
}
