use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns PONG, or echoes the optional message argument.
///
/// Ref: <https://redis.io/docs/latest/commands/ping/>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub message: Option<Bytes>,
}

impl Executable for Ping {
    fn exec(self, _store: &Store) -> Result<Frame, Error> {
        match self.message {
            Some(message) => Ok(Frame::Bulk(message)),
            None => Ok(Frame::Simple("PONG".to_string())),
        }
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let message = parser.next_bytes().ok();
        Ok(Self { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_message() {
        let store = Store::new();
        let frame = Ping { message: None }.exec(&store).unwrap();
        assert_eq!(frame, Frame::Simple("PONG".to_string()));
    }

    #[test]
    fn with_message() {
        let store = Store::new();
        let frame = Ping {
            message: Some(Bytes::from("hello")),
        }
        .exec(&store)
        .unwrap();
        assert_eq!(frame, Frame::Bulk(Bytes::from("hello")));
    }
}
