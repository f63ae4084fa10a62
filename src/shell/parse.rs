use crate::shell::command::{Command, DebugTarget};

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "ls" | "list" => Some(Command::Ls),
        "create" => {
            let name = args.first()?;
            let size = args.get(1)?.parse().ok()?;
            Some(Command::Create(name.to_string(), size))
        }
        "rm" | "remove" => args.first().map(|&name| Command::Rm(name.to_string())),
        "read" => {
            let name = args.first()?;
            let start = args.get(1)?.parse().ok()?;
            let end = args.get(2)?.parse().ok()?;
            Some(Command::Read(name.to_string(), start, end))
        }
        "order" => args.first().map(|&name| Command::Order(name.to_string())),
        "concat" => {
            if args.len() >= 3 {
                Some(Command::Concat(
                    args[0].to_string(),
                    args[1].to_string(),
                    args[2].to_string(),
                ))
            } else {
                None
            }
        }
        "debug" => match args.first().copied() {
            Some("super") => Some(Command::Debug(DebugTarget::Super)),
            Some("bitmap") => Some(Command::Debug(DebugTarget::Bitmap)),
            Some("inodes") => Some(Command::Debug(DebugTarget::Inodes)),
            _ => None,
        },
        "exit" | "quit" => Some(Command::Exit),
        _ => None,
    }
}
