//! Command parsing: raw text lines into typed commands, with per-sender rate
//! limiting.

mod parser;
mod rate_limit;

pub use parser::{parse_command, Command, CommandParser, ParseError, PetAction, QuestAction};
pub use rate_limit::RateLimiter;

/// One line per verb, shown by `help`.
pub const HELP_LINES: &[&str] = &[
    "go <north|south|east|west> - start moving (n/s/e/w also work)",
    "attack <name> - melee the named target",
    "cast <ability> [target] - use an ability",
    "say <message> - talk to everyone in the zone",
    "look - describe your surroundings",
    "loot - pick up nearby drops",
    "inventory (inv) - list your items",
    "vendor - list items for sale",
    "buy <item> [qty] - buy from the vendor",
    "sell <slot> [qty] - sell from an inventory slot",
    "travel <zone> - pass through a nearby door",
    "quest list|start <id>|status|abandon <id>",
    "pet list|adopt <type> <name>|summon <id>|dismiss <id>|use <id> <ability>|status",
    "help - show this list",
];
