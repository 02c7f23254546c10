//! Line-oriented request parsing and reply formatting
//!
//! One command per line, whitespace separated. Replies are a single line.

use std::fmt;

/// Parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `PUT <key> <value>` (alias `SET`)
    Put(String, String),
    /// `GET <key>`
    Get(String),
    /// `PEEK <key>`
    Peek(String),
    /// `DEL <key>...`
    Del(Vec<String>),
    /// `EXISTS <key>...`
    Exists(Vec<String>),
    /// `KEYS`
    Keys,
    /// `LEN`
    Len,
    /// `STATS`
    Stats,
    /// `CLEAR`
    Clear,
    /// `PING`
    Ping,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default().to_uppercase();
        let args: Vec<String> = parts.map(str::to_string).collect();

        let cmd = match name.as_str() {
            "PUT" | "SET" => {
                let [key, value] = exact::<2>(&name, args)?;
                Command::Put(key, value)
            }
            "GET" => {
                let [key] = exact::<1>(&name, args)?;
                Command::Get(key)
            }
            "PEEK" => {
                let [key] = exact::<1>(&name, args)?;
                Command::Peek(key)
            }
            "DEL" => Command::Del(at_least_one(&name, args)?),
            "EXISTS" => Command::Exists(at_least_one(&name, args)?),
            "KEYS" => nullary(&name, args, Command::Keys)?,
            "LEN" => nullary(&name, args, Command::Len)?,
            "STATS" => nullary(&name, args, Command::Stats)?,
            "CLEAR" => nullary(&name, args, Command::Clear)?,
            "PING" => nullary(&name, args, Command::Ping)?,
            _ => return Err(format!("unknown command '{}'", name)),
        };
        Ok(Some(cmd))
    }
}

fn wrong_arity(name: &str) -> String {
    format!("wrong number of arguments for '{}' command", name.to_lowercase())
}

fn exact<const N: usize>(name: &str, args: Vec<String>) -> Result<[String; N], String> {
    args.try_into().map_err(|_| wrong_arity(name))
}

fn at_least_one(name: &str, args: Vec<String>) -> Result<Vec<String>, String> {
    if args.is_empty() {
        return Err(wrong_arity(name));
    }
    Ok(args)
}

fn nullary(name: &str, args: Vec<String>, cmd: Command) -> Result<Command, String> {
    if !args.is_empty() {
        return Err(wrong_arity(name));
    }
    Ok(cmd)
}

/// Shell reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain status line, e.g. `OK`
    Status(String),
    /// Rendered value
    Value(String),
    /// Absent value
    Nil,
    /// Count
    Integer(i64),
    /// Space separated list
    List(Vec<String>),
    /// Error line carrying an optional numeric code
    Error(Option<u16>, String),
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) | Reply::Value(s) => f.write_str(s),
            Reply::Nil => f.write_str("(nil)"),
            Reply::Integer(i) => write!(f, "{}", i),
            Reply::List(items) => f.write_str(&items.join(" ")),
            Reply::Error(Some(code), msg) => write!(f, "ERR {} {}", code, msg),
            Reply::Error(None, msg) => write!(f, "ERR {}", msg),
        }
    }
}
