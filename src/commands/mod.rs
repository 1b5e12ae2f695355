//! Chat commands: parsing message text and turning commands into replies.

mod dispatch;

pub use dispatch::{dispatch, Attachment, CommandReply, IncomingMessage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// `show_city <name>` or `show_city <name>|<color>`
    ShowCity { city: String, color: Option<String> },
    /// `show_my_cities [color]`
    ShowMyCities { color: Option<String> },
    RememberCity { city: String },
    /// `distance <city1>, <city2>`; `None` when the arguments don't split into two names
    Distance { cities: Option<(String, String)> },
    Unknown(String),
}

impl Command {
    /// Parse a chat message. Returns `None` for text that isn't a command.
    pub fn parse(prefix: &str, text: &str) -> Option<Command> {
        let body = text.trim_start().strip_prefix(prefix)?;
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body.trim_end(), ""),
        };

        let command = match name {
            "start" => Command::Start,
            "help_me" => Command::Help,
            "show_city" => {
                let (city, color) = match args.split_once('|') {
                    Some((city, color)) => (city.trim(), non_empty(color)),
                    None => (args, None),
                };
                Command::ShowCity {
                    city: city.to_string(),
                    color,
                }
            }
            "show_my_cities" => Command::ShowMyCities {
                color: non_empty(args),
            },
            "remember_city" => Command::RememberCity {
                city: args.to_string(),
            },
            "distance" => Command::Distance {
                cities: args
                    .split_once([',', '|'])
                    .and_then(|(a, b)| Some((non_empty(a)?, non_empty(b)?))),
            },
            other => Command::Unknown(other.to_string()),
        };

        Some(command)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
