/// Available commands for the ':' palette

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "files",
    aliases: &["f", "ls"],
    description: "Back to the file listing, filters cleared",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Clear the page cache and refetch",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit f9s",
  },
];

/// Suggestions for the palette input: exact name first, then alias, then
/// prefix matches on either.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();

  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let rank = if cmd.name == input {
      0
    } else if cmd.aliases.contains(&input.as_str()) {
      1
    } else if cmd.name.starts_with(&input) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input)) {
      3
    } else {
      continue;
    };
    matches.push((cmd, rank));
  }

  matches.sort_by_key(|(_, rank)| *rank);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
