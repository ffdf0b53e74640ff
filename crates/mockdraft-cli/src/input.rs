// Line-based command parsing for the human's turn.

use mockdraft_core::draft::player::Position;

/// What the person at the prompt asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Take the player at this 1-based index of the displayed list.
    Pick(usize),
    /// Take the available player with this exact name.
    PickByName(String),
    /// Show only one position, or clear the filter with `None`.
    Filter(Option<Position>),
    /// Show more (or fewer) players in the list.
    Show(usize),
    /// Redraw the list without doing anything.
    Refresh,
    Help,
    Quit,
    /// Anything else, with the reason it was not understood.
    Unknown(String),
}

pub const HELP: &str = "\
  <n>          draft player number n from the list
  p <name>     draft a player by exact name
  f <POS>      show only QB/RB/WR/TE/K/DEF
  f            clear the position filter
  s <n>        show the top n players
  q            quit (the board so far is still saved)
  ?            this help";

/// Parse one input line.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Refresh;
    }
    if let Ok(n) = line.parse::<usize>() {
        return if n == 0 {
            Command::Unknown("list numbers start at 1".into())
        } else {
            Command::Pick(n)
        };
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Command::Quit,
        "?" | "h" | "help" => Command::Help,
        "f" | "filter" if rest.is_empty() => Command::Filter(None),
        "f" | "filter" => match Position::from_str_pos(rest) {
            Some(pos) if !pos.is_meta_slot() => Command::Filter(Some(pos)),
            _ => Command::Unknown(format!("unknown position `{rest}`")),
        },
        "p" | "pick" if !rest.is_empty() => Command::PickByName(rest.to_string()),
        "s" | "show" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Show(n),
            _ => Command::Unknown("usage: s <count>".into()),
        },
        _ => Command::Unknown(format!("unrecognised command `{line}`")),
    }
}
