pub mod dbsize;
pub mod del;
pub mod echo;
pub mod executable;
pub mod exists;
pub mod get;
pub mod hdel;
pub mod hget;
pub mod hgetall;
pub mod hscan;
pub mod hset;
pub mod keys;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod ping;
pub mod rpop;
pub mod rpush;
pub mod sadd;
pub mod scan;
pub mod set;
pub mod sismember;
pub mod smembers;
pub mod sscan;
pub mod srem;
pub mod zadd;
pub mod zrange;
pub mod zrem;
pub mod zscore;

use std::{str, vec};

use bytes::Bytes;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::request::Request;
use crate::store::Store;
use crate::Error;

use dbsize::DbSize;
use del::Del;
use echo::Echo;
use exists::Exists;
use get::Get;
use hdel::HDel;
use hget::HGet;
use hgetall::HGetAll;
use hscan::HScan;
use hset::HSet;
use keys::Keys;
use lpop::LPop;
use lpush::LPush;
use lrange::LRange;
use ping::Ping;
use rpop::RPop;
use rpush::RPush;
use sadd::SAdd;
use scan::Scan;
use set::Set;
use sismember::SIsMember;
use smembers::SMembers;
use sscan::SScan;
use srem::SRem;
use zadd::ZAdd;
use zrange::ZRange;
use zrem::ZRem;
use zscore::ZScore;

#[derive(Debug, PartialEq)]
pub enum Command {
    DbSize(DbSize),
    Del(Del),
    Echo(Echo),
    Exists(Exists),
    Get(Get),
    HDel(HDel),
    HGet(HGet),
    HGetAll(HGetAll),
    HScan(HScan),
    HSet(HSet),
    Keys(Keys),
    LPop(LPop),
    LPush(LPush),
    LRange(LRange),
    Ping(Ping),
    RPop(RPop),
    RPush(RPush),
    SAdd(SAdd),
    Scan(Scan),
    SIsMember(SIsMember),
    SMembers(SMembers),
    SScan(SScan),
    SRem(SRem),
    Set(Set),
    ZAdd(ZAdd),
    ZRange(ZRange),
    ZRem(ZRem),
    ZScore(ZScore),
}

impl Executable for Command {
    fn exec(self, store: &Store) -> Result<Frame, Error> {
        match self {
            Command::DbSize(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Echo(cmd) => cmd.exec(store),
            Command::Exists(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::HDel(cmd) => cmd.exec(store),
            Command::HGet(cmd) => cmd.exec(store),
            Command::HGetAll(cmd) => cmd.exec(store),
            Command::HScan(cmd) => cmd.exec(store),
            Command::HSet(cmd) => cmd.exec(store),
            Command::Keys(cmd) => cmd.exec(store),
            Command::LPop(cmd) => cmd.exec(store),
            Command::LPush(cmd) => cmd.exec(store),
            Command::LRange(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::RPop(cmd) => cmd.exec(store),
            Command::RPush(cmd) => cmd.exec(store),
            Command::SAdd(cmd) => cmd.exec(store),
            Command::Scan(cmd) => cmd.exec(store),
            Command::SIsMember(cmd) => cmd.exec(store),
            Command::SMembers(cmd) => cmd.exec(store),
            Command::SScan(cmd) => cmd.exec(store),
            Command::SRem(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::ZAdd(cmd) => cmd.exec(store),
            Command::ZRange(cmd) => cmd.exec(store),
            Command::ZRem(cmd) => cmd.exec(store),
            Command::ZScore(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Request> for Command {
    type Error = Error;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        let parser = &mut CommandParser {
            parts: request.parts.into_iter(),
        };

        let command_name = parser.parse_command_name()?;

        match &command_name[..] {
            "dbsize" => DbSize::try_from(parser).map(Command::DbSize),
            "del" => Del::try_from(parser).map(Command::Del),
            "echo" => Echo::try_from(parser).map(Command::Echo),
            "exists" => Exists::try_from(parser).map(Command::Exists),
            "get" => Get::try_from(parser).map(Command::Get),
            "hdel" => HDel::try_from(parser).map(Command::HDel),
            "hget" => HGet::try_from(parser).map(Command::HGet),
            "hgetall" => HGetAll::try_from(parser).map(Command::HGetAll),
            "hscan" => HScan::try_from(parser).map(Command::HScan),
            "hset" => HSet::try_from(parser).map(Command::HSet),
            "keys" => Keys::try_from(parser).map(Command::Keys),
            "lpop" => LPop::try_from(parser).map(Command::LPop),
            "lpush" => LPush::try_from(parser).map(Command::LPush),
            "lrange" => LRange::try_from(parser).map(Command::LRange),
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "rpop" => RPop::try_from(parser).map(Command::RPop),
            "rpush" => RPush::try_from(parser).map(Command::RPush),
            "sadd" => SAdd::try_from(parser).map(Command::SAdd),
            "scan" => Scan::try_from(parser).map(Command::Scan),
            "sismember" => SIsMember::try_from(parser).map(Command::SIsMember),
            "smembers" => SMembers::try_from(parser).map(Command::SMembers),
            "sscan" => SScan::try_from(parser).map(Command::SScan),
            "srem" => SRem::try_from(parser).map(Command::SRem),
            "set" => Set::try_from(parser).map(Command::Set),
            "zadd" => ZAdd::try_from(parser).map(Command::ZAdd),
            "zrange" => ZRange::try_from(parser).map(Command::ZRange),
            "zrem" => ZRem::try_from(parser).map(Command::ZRem),
            "zscore" => ZScore::try_from(parser).map(Command::ZScore),
            _ => Err(CommandParserError::UnknownCommand {
                command: command_name,
            }
            .into()),
        }
    }
}

/// Runs one decoded request against the store, folding every failure
/// (unknown command, bad arity, unparsable argument, type mismatch) into an
/// error reply. The connection stays usable afterward.
pub fn dispatch(store: &Store, request: Request) -> Frame {
    match Command::try_from(request) {
        Ok(command) => command
            .exec(store)
            .unwrap_or_else(|err| Frame::Error(err.to_string())),
        Err(err) => Frame::Error(err.to_string()),
    }
}

/// Re-entrant execution entrypoint taking a bare command name and argument
/// list. This is what append-log replay calls at startup to reconstruct
/// store state.
pub fn execute(store: &Store, command: &str, args: Vec<Bytes>) -> Frame {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(Bytes::from(command.to_string()));
    parts.extend(args);
    dispatch(store, Request { parts })
}

/// Whether a command mutates the store and therefore belongs in the append
/// log.
pub fn is_write_command(command: &str) -> bool {
    matches!(
        command.to_lowercase().as_str(),
        "set" | "del"
            | "hset"
            | "hdel"
            | "lpush"
            | "rpush"
            | "lpop"
            | "rpop"
            | "sadd"
            | "srem"
            | "zadd"
            | "zrem"
    )
}

pub(crate) struct CommandParser {
    parts: vec::IntoIter<Bytes>,
}

impl CommandParser {
    fn parse_command_name(&mut self) -> Result<String, CommandParserError> {
        self.next_string().map(|name| name.to_lowercase())
    }

    pub(crate) fn next_string(&mut self) -> Result<String, CommandParserError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(|_| CommandParserError::InvalidUtf8)
    }

    pub(crate) fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        self.parts.next().ok_or(CommandParserError::EndOfStream)
    }

    pub(crate) fn next_i64(&mut self) -> Result<i64, CommandParserError> {
        self.next_string()?
            .parse::<i64>()
            .map_err(|_| CommandParserError::InvalidInteger)
    }

    pub(crate) fn next_f64(&mut self) -> Result<f64, CommandParserError> {
        let score = self
            .next_string()?
            .parse::<f64>()
            .map_err(|_| CommandParserError::InvalidFloat)?;
        if !score.is_finite() {
            return Err(CommandParserError::InvalidFloat);
        }
        Ok(score)
    }

    pub(crate) fn next_cursor(&mut self) -> Result<u64, CommandParserError> {
        self.next_string()?
            .parse::<u64>()
            .map_err(|_| CommandParserError::InvalidCursor)
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("ERR wrong number of arguments")]
    EndOfStream,
    #[error("ERR unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("ERR syntax error")]
    Syntax,
    #[error("ERR value is not an integer or out of range")]
    InvalidInteger,
    #[error("ERR value is not a valid float")]
    InvalidFloat,
    #[error("ERR invalid cursor")]
    InvalidCursor,
    #[error("ERR invalid UTF-8 in argument")]
    InvalidUtf8,
}

/// Renders a sorted-set score the way clients expect: integral scores
/// without a trailing `.0`.
pub(crate) fn format_score(score: f64) -> String {
    if score == score.trunc() && score.abs() < 1e17 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(parts: &[&str]) -> Request {
        Request {
            parts: parts.iter().map(|s| Bytes::from(s.to_string())).collect(),
        }
    }

    #[test]
    fn command_name_is_case_insensitive() {
        let store = Store::new();
        assert_eq!(
            dispatch(&store, request(&["PiNg"])),
            Frame::Simple("PONG".to_string())
        );
    }

    #[test]
    fn unknown_command_is_an_error_reply() {
        let store = Store::new();
        assert_eq!(
            dispatch(&store, request(&["frobnicate", "x"])),
            Frame::Error("ERR unknown command 'frobnicate'".to_string())
        );
    }

    #[test]
    fn missing_arguments_are_an_error_reply() {
        let store = Store::new();
        assert_eq!(
            dispatch(&store, request(&["get"])),
            Frame::Error("ERR wrong number of arguments".to_string())
        );
    }

    #[test]
    fn wrong_kind_is_an_error_reply_and_leaves_state() {
        let store = Store::new();
        dispatch(&store, request(&["set", "k", "v"]));

        let reply = dispatch(&store, request(&["lpush", "k", "x"]));
        assert_eq!(
            reply,
            Frame::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".to_string()
            )
        );
        assert_eq!(
            dispatch(&store, request(&["get", "k"])),
            Frame::Bulk(Bytes::from("v"))
        );
    }

    #[test]
    fn execute_is_reentrant_for_replay() {
        let store = Store::new();
        execute(&store, "SET", vec![Bytes::from("k"), Bytes::from("v")]);
        execute(&store, "SADD", vec![Bytes::from("s"), Bytes::from("m")]);

        assert_eq!(store.get_string("k"), Some(Bytes::from("v")));
        assert_eq!(store.set_is_member("s", "m"), Ok(true));
    }

    #[test]
    fn write_commands_are_classified() {
        for command in ["SET", "del", "LPush", "zadd"] {
            assert!(is_write_command(command));
        }
        for command in ["GET", "keys", "SCAN", "zrange"] {
            assert!(!is_write_command(command));
        }
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(2.0), "2");
        assert_eq!(format_score(-3.0), "-3");
        assert_eq!(format_score(1.5), "1.5");
    }
}
