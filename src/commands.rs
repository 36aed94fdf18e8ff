/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "log",
    aliases: &["l", "add", "mood"],
    description: "Log a mood: log <mood> <value>",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload", "history"],
    description: "Reload mood history from the server",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit mindwell",
  },
];

/// A command line resolved to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Raw arguments; the tracker validates them
  Log { mood: String, value: String },
  Refresh,
  Quit,
  Unknown(String),
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    if cmd.name == input_lower {
      matches.push((cmd, 0));
      continue;
    }

    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
    }
  }

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Command named exactly by `word` or one of its aliases.
pub fn find(word: &str) -> Option<&'static Command> {
  let word = word.to_lowercase();
  COMMANDS
    .iter()
    .find(|c| c.name == word || c.aliases.contains(&word.as_str()))
}

/// Resolve a submitted command line.
///
/// The first word must name a command or alias exactly; the rest are
/// arguments.
pub fn parse(line: &str) -> Action {
  let mut words = line.split_whitespace();
  let Some(head) = words.next() else {
    return Action::Unknown(String::new());
  };
  match find(head).map(|c| c.name) {
    Some("log") => Action::Log {
      mood: words.next().unwrap_or("").to_lowercase(),
      value: words.next().unwrap_or("").to_string(),
    },
    Some("refresh") => Action::Refresh,
    Some("quit") => Action::Quit,
    _ => Action::Unknown(line.trim().to_string()),
  }
}
