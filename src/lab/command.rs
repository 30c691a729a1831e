/// Command vocabulary as listed by `help`.
pub const COMMAND_SUMMARY: [&str; 9] = [
    "help",
    "ls",
    "cat <path>",
    "edit <path>",
    "status",
    "hint [task-id]",
    "validate",
    "reset",
    "clear",
];

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls,
    Cat(Option<String>),
    Edit(Option<String>),
    Status,
    Hint(Option<String>),
    Validate,
    Reset,
    Clear,
    Unknown(String),
}

/// Parse a single input line. Blank input yields `None`.
///
/// The first whitespace-delimited token names the command (case-insensitive);
/// the remaining tokens are re-joined with single spaces into one argument.
pub fn parse_command(input: &str) -> Option<Command> {
    let mut tokens = input.split_whitespace();
    let name = tokens.next()?;
    let arg = tokens.collect::<Vec<_>>().join(" ");
    let arg = (!arg.is_empty()).then_some(arg);
    let command = match name.to_lowercase().as_str() {
        "help" => Command::Help,
        "ls" => Command::Ls,
        "cat" | "view" => Command::Cat(arg),
        "edit" => Command::Edit(arg),
        "status" => Command::Status,
        "hint" => Command::Hint(arg),
        "validate" | "submit" => Command::Validate,
        "reset" => Command::Reset,
        "clear" => Command::Clear,
        _ => Command::Unknown(name.to_string()),
    };
    Some(command)
}
