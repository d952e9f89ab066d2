//! Text command grammar.

use emberfall_domain::{Direction, PlayerId};

use super::RateLimiter;

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Go(Direction),
    Attack { target: String },
    Cast { ability: String, target: Option<String> },
    Say { message: String },
    Look,
    Loot,
    Help,
    Inventory,
    Vendor,
    Buy { item: String, quantity: u32 },
    /// `slot` is 1-based, as typed.
    Sell { slot: usize, quantity: u32 },
    Travel { zone: String },
    Quest(QuestAction),
    Pet(PetAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestAction {
    List,
    Start(String),
    Status,
    Abandon(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetAction {
    List,
    Adopt { kind: String, name: String },
    Summon(u32),
    Dismiss(u32),
    Use { pet: u32, ability: String },
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Type a command. Try 'help'.")]
    EmptyCommand,

    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("'{0}' is not a direction. Use north, south, east or west.")]
    InvalidDirection(String),

    #[error("Usage: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("Invalid {what}: '{value}'")]
    InvalidArgument { what: &'static str, value: String },

    #[error("You are sending commands too quickly.")]
    RateLimited,
}

impl ParseError {
    fn missing(usage: &'static str) -> Self {
        Self::MissingArgument { usage }
    }

    fn invalid(what: &'static str, value: &str) -> Self {
        Self::InvalidArgument {
            what,
            value: value.to_string(),
        }
    }
}

/// Parses a single line. Does not rate limit.
pub fn parse_command(text: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((verb, args)) = tokens.split_first() else {
        return Err(ParseError::EmptyCommand);
    };
    let rest = || (!args.is_empty()).then(|| args.join(" "));

    match verb.to_ascii_lowercase().as_str() {
        "go" => {
            let raw = args.first().ok_or(ParseError::missing("go <direction>"))?;
            raw.parse::<Direction>()
                .map(Command::Go)
                .map_err(|()| ParseError::InvalidDirection((*raw).to_string()))
        }
        "attack" => Ok(Command::Attack {
            target: rest().ok_or(ParseError::missing("attack <name>"))?,
        }),
        "cast" => {
            let (ability, target) = args
                .split_first()
                .ok_or(ParseError::missing("cast <ability> [target]"))?;
            Ok(Command::Cast {
                ability: ability.to_ascii_lowercase(),
                target: (!target.is_empty()).then(|| target.join(" ")),
            })
        }
        "say" => Ok(Command::Say {
            message: rest().ok_or(ParseError::missing("say <message>"))?,
        }),
        "look" => Ok(Command::Look),
        "loot" => Ok(Command::Loot),
        "help" => Ok(Command::Help),
        "inventory" | "inv" => Ok(Command::Inventory),
        "vendor" => Ok(Command::Vendor),
        "buy" => {
            let item = args.first().ok_or(ParseError::missing("buy <item> [qty]"))?;
            Ok(Command::Buy {
                item: item.to_ascii_lowercase(),
                quantity: parse_quantity(args.get(1))?,
            })
        }
        "sell" => {
            let raw = args.first().ok_or(ParseError::missing("sell <slot> [qty]"))?;
            let slot = raw
                .parse::<usize>()
                .ok()
                .filter(|&slot| slot > 0)
                .ok_or_else(|| ParseError::invalid("slot", raw))?;
            Ok(Command::Sell {
                slot,
                quantity: parse_quantity(args.get(1))?,
            })
        }
        "travel" => {
            let zone = args.first().ok_or(ParseError::missing("travel <zone>"))?;
            Ok(Command::Travel {
                zone: zone.to_ascii_lowercase(),
            })
        }
        "quest" => parse_quest(args).map(Command::Quest),
        "pet" => parse_pet(args).map(Command::Pet),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_quantity(raw: Option<&&str>) -> Result<u32, ParseError> {
    match raw {
        None => Ok(1),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|&qty| qty > 0)
            .ok_or_else(|| ParseError::invalid("quantity", raw)),
    }
}

fn parse_id(raw: &str) -> Result<u32, ParseError> {
    raw.parse().map_err(|_| ParseError::invalid("pet id", raw))
}

fn parse_quest(args: &[&str]) -> Result<QuestAction, ParseError> {
    const USAGE: &str = "quest list|start <id>|status|abandon <id>";
    let (action, rest) = args.split_first().ok_or(ParseError::missing(USAGE))?;
    let id = || {
        rest.first()
            .map(|id| id.to_ascii_lowercase())
            .ok_or(ParseError::missing(USAGE))
    };
    match action.to_ascii_lowercase().as_str() {
        "list" => Ok(QuestAction::List),
        "status" => Ok(QuestAction::Status),
        "start" => Ok(QuestAction::Start(id()?)),
        "abandon" => Ok(QuestAction::Abandon(id()?)),
        _ => Err(ParseError::invalid("quest action", action)),
    }
}

fn parse_pet(args: &[&str]) -> Result<PetAction, ParseError> {
    const USAGE: &str =
        "pet list|adopt <type> <name>|summon <id>|dismiss <id>|use <id> <ability>|status";
    let (action, rest) = args.split_first().ok_or(ParseError::missing(USAGE))?;
    match action.to_ascii_lowercase().as_str() {
        "list" => Ok(PetAction::List),
        "status" => Ok(PetAction::Status),
        "adopt" => match rest {
            [kind, name @ ..] if !name.is_empty() => Ok(PetAction::Adopt {
                kind: kind.to_ascii_lowercase(),
                name: name.join(" "),
            }),
            _ => Err(ParseError::missing("pet adopt <type> <name>")),
        },
        "summon" => {
            let raw = rest.first().ok_or(ParseError::missing("pet summon <id>"))?;
            parse_id(raw).map(PetAction::Summon)
        }
        "dismiss" => {
            let raw = rest.first().ok_or(ParseError::missing("pet dismiss <id>"))?;
            parse_id(raw).map(PetAction::Dismiss)
        }
        "use" => match rest {
            [raw, ability, ..] => Ok(PetAction::Use {
                pet: parse_id(raw)?,
                ability: ability.to_ascii_lowercase(),
            }),
            _ => Err(ParseError::missing("pet use <id> <ability>")),
        },
        _ => Err(ParseError::invalid("pet action", action)),
    }
}

/// Parser front-end that applies the per-sender rate limit.
#[derive(Debug)]
pub struct CommandParser {
    limiter: RateLimiter<PlayerId>,
}

impl CommandParser {
    pub fn new(rate_limit: usize, window_ms: i64) -> Self {
        Self {
            limiter: RateLimiter::new(rate_limit, window_ms),
        }
    }

    /// Empty input is rejected before the limiter is consulted; only commands
    /// that parse are counted against the sender.
    pub fn parse(&mut self, sender: PlayerId, text: &str, now: i64) -> Result<Command, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyCommand);
        }
        if !self.limiter.allows(&sender, now) {
            return Err(ParseError::RateLimited);
        }
        let command = parse_command(text)?;
        self.limiter.record(sender, now);
        Ok(command)
    }

    pub fn forget(&mut self, sender: &PlayerId) {
        self.limiter.forget(sender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_accepts_short_directions() {
        assert_eq!(parse_command("go n"), Ok(Command::Go(Direction::North)));
        assert_eq!(parse_command("GO West"), Ok(Command::Go(Direction::West)));
        assert_eq!(
            parse_command("go up"),
            Err(ParseError::InvalidDirection("up".into()))
        );
        assert!(matches!(
            parse_command("go"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn cast_splits_ability_and_optional_target() {
        assert_eq!(
            parse_command("cast Fireball dire wolf"),
            Ok(Command::Cast {
                ability: "fireball".into(),
                target: Some("dire wolf".into())
            })
        );
        assert_eq!(
            parse_command("cast heal"),
            Ok(Command::Cast {
                ability: "heal".into(),
                target: None
            })
        );
    }

    #[test]
    fn say_and_attack_keep_the_rest_of_the_line() {
        assert_eq!(
            parse_command("say hello   there"),
            Ok(Command::Say {
                message: "hello there".into()
            })
        );
        assert_eq!(
            parse_command("attack Wolf"),
            Ok(Command::Attack {
                target: "Wolf".into()
            })
        );
    }

    #[test]
    fn unknown_verb_is_reported() {
        assert_eq!(
            parse_command("dance"),
            Err(ParseError::UnknownCommand("dance".into()))
        );
        assert_eq!(parse_command("   "), Err(ParseError::EmptyCommand));
    }

    #[test]
    fn trade_commands_parse_quantities() {
        assert_eq!(
            parse_command("buy health_potion 3"),
            Ok(Command::Buy {
                item: "health_potion".into(),
                quantity: 3
            })
        );
        assert_eq!(
            parse_command("sell 2"),
            Ok(Command::Sell {
                slot: 2,
                quantity: 1
            })
        );
        assert!(matches!(
            parse_command("buy health_potion lots"),
            Err(ParseError::InvalidArgument { what: "quantity", .. })
        ));
        assert!(matches!(
            parse_command("sell 0"),
            Err(ParseError::InvalidArgument { what: "slot", .. })
        ));
        assert_eq!(parse_command("inv"), Ok(Command::Inventory));
    }

    #[test]
    fn quest_and_pet_sub_grammars() {
        assert_eq!(
            parse_command("quest start Clear_Wilds"),
            Ok(Command::Quest(QuestAction::Start("clear_wilds".into())))
        );
        assert_eq!(parse_command("quest status"), Ok(Command::Quest(QuestAction::Status)));
        assert!(parse_command("quest frobnicate").is_err());
        assert_eq!(
            parse_command("pet adopt wolf_pup Sir Fluff"),
            Ok(Command::Pet(PetAction::Adopt {
                kind: "wolf_pup".into(),
                name: "Sir Fluff".into()
            }))
        );
        assert_eq!(
            parse_command("pet use 1 bite"),
            Ok(Command::Pet(PetAction::Use {
                pet: 1,
                ability: "bite".into()
            }))
        );
        assert!(matches!(
            parse_command("pet summon rex"),
            Err(ParseError::InvalidArgument { what: "pet id", .. })
        ));
    }

    #[test]
    fn eleventh_command_in_window_is_rate_limited() {
        let mut parser = CommandParser::new(10, 1_000);
        let sender = PlayerId::new();
        for i in 0..10 {
            assert!(parser.parse(sender, "look", i * 10).is_ok());
        }
        assert_eq!(parser.parse(sender, "look", 500), Err(ParseError::RateLimited));
        assert!(parser.parse(sender, "look", 1_200).is_ok());
    }

    #[test]
    fn empty_and_invalid_commands_do_not_count() {
        let mut parser = CommandParser::new(1, 1_000);
        let sender = PlayerId::new();
        assert_eq!(parser.parse(sender, "", 0), Err(ParseError::EmptyCommand));
        assert!(parser.parse(sender, "dance", 0).is_err());
        assert!(parser.parse(sender, "look", 0).is_ok());
        assert_eq!(parser.parse(sender, "", 1), Err(ParseError::EmptyCommand));
        assert_eq!(parser.parse(sender, "look", 1), Err(ParseError::RateLimited));
    }
}
