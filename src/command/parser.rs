use super::Command;
use crate::core::{KvError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    static ref SEPARATOR: Regex = Regex::new(r"\s+").expect("separator pattern is valid");
}

fn expect_args(command: &'static str, args: &[&str], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(KvError::WrongFormat {
            command,
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

impl FromStr for Command {
    type Err = KvError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(KvError::EmptyCommand);
        }

        let tokens: Vec<&str> = SEPARATOR.split(trimmed).collect();
        let (name, args) = match tokens.split_first() {
            Some((name, args)) => (*name, args),
            None => return Err(KvError::EmptyCommand),
        };

        let command = match name {
            "set" => {
                expect_args("set", args, 2)?;
                Command::Set {
                    key: args[0].to_string(),
                    value: args[1].to_string(),
                }
            }
            "get" => {
                expect_args("get", args, 1)?;
                Command::Get {
                    key: args[0].to_string(),
                }
            }
            "delete" => {
                expect_args("delete", args, 1)?;
                Command::Delete {
                    key: args[0].to_string(),
                }
            }
            "count" => {
                expect_args("count", args, 1)?;
                Command::Count {
                    value: args[0].to_string(),
                }
            }
            "begin" => expect_args("begin", args, 0).map(|_| Command::Begin)?,
            "commit" => expect_args("commit", args, 0).map(|_| Command::Commit)?,
            "rollback" => expect_args("rollback", args, 0).map(|_| Command::Rollback)?,
            "q" => expect_args("q", args, 0).map(|_| Command::Exit)?,
            "y" => Command::Confirm,
            "n" => Command::Deny,
            other => return Err(KvError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let command: Command = "set foo 123".parse().unwrap();
        assert_eq!(
            command,
            Command::Set {
                key: "foo".into(),
                value: "123".into()
            }
        );
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let command: Command = "  get \t  foo  ".parse().unwrap();
        assert_eq!(command, Command::Get { key: "foo".into() });
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!("begin".parse::<Command>().unwrap(), Command::Begin);
        assert_eq!("commit".parse::<Command>().unwrap(), Command::Commit);
        assert_eq!("rollback".parse::<Command>().unwrap(), Command::Rollback);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Exit);
        assert_eq!("y".parse::<Command>().unwrap(), Command::Confirm);
        assert_eq!("n".parse::<Command>().unwrap(), Command::Deny);
    }

    #[test]
    fn test_wrong_arity() {
        let err = "set foo".parse::<Command>().unwrap_err();
        assert_eq!(
            err,
            KvError::WrongFormat {
                command: "set",
                expected: 2,
                found: 1
            }
        );
        assert!("get".parse::<Command>().is_err());
        assert!("begin now".parse::<Command>().is_err());
        assert!("count 1 2".parse::<Command>().is_err());
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            Command::from_input("upsert a b"),
            Command::Error("Unknown command.".into())
        );
        assert_eq!(
            Command::from_input("   "),
            Command::Error("Looks like have no command. Please enter command.".into())
        );
        assert_eq!(
            Command::from_input("delete"),
            Command::Error("Wrong command format.".into())
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(matches!(Command::from_input("SET a b"), Command::Error(_)));
    }
}
