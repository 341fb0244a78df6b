//! Commands typed on stdin while a project plays.

use pdb_protocol::ipc::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Finish the current step now.
    Next,
    /// Pick a choice by its zero-based index.
    Select(usize),
    Dismiss,
    Quit,
    Unknown,
}

impl Command {
    /// The op a continuously playing controller should receive.
    pub fn into_op(self) -> Option<Op> {
        match self {
            Command::Next => Some(Op::StepOnce),
            Command::Select(index) => Some(Op::SelectChoice { index }),
            Command::Dismiss => Some(Op::DismissChoices),
            Command::Quit => Some(Op::Cancel),
            Command::Unknown => None,
        }
    }
}

/// Parse one input line. Choices are numbered from 1 on screen.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "" | "n" | "next" => Command::Next,
        "d" | "dismiss" => Command::Dismiss,
        "q" | "quit" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(number) if number >= 1 => Command::Select(number - 1),
            _ => Command::Unknown,
        },
    }
}

pub const HELP: &str = "enter/n: next step  1..9: choose  d: dismiss  q: quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(""), Command::Next);
        assert_eq!(parse_command("  N \n"), Command::Next);
        assert_eq!(parse_command("next"), Command::Next);
        assert_eq!(parse_command("d"), Command::Dismiss);
        assert_eq!(parse_command("Q"), Command::Quit);
        assert_eq!(parse_command("exit"), Command::Quit);
    }

    #[test]
    fn test_choice_numbers_are_one_based() {
        assert_eq!(parse_command("1"), Command::Select(0));
        assert_eq!(parse_command(" 3 "), Command::Select(2));
        assert_eq!(parse_command("0"), Command::Unknown);
        assert_eq!(parse_command("-1"), Command::Unknown);
        assert_eq!(parse_command("approve"), Command::Unknown);
    }

    #[test]
    fn test_into_op() {
        assert_eq!(Command::Next.into_op(), Some(Op::StepOnce));
        assert_eq!(
            Command::Select(1).into_op(),
            Some(Op::SelectChoice { index: 1 })
        );
        assert_eq!(Command::Dismiss.into_op(), Some(Op::DismissChoices));
        assert_eq!(Command::Quit.into_op(), Some(Op::Cancel));
        assert_eq!(Command::Unknown.into_op(), None);
    }
}
