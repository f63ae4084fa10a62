pub mod command;
pub mod debug;
pub mod parse;

use std::io::stdout;
use std::path::PathBuf;

use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::disk::FileDisk;
use crate::fs::config::{DISK_SIZE, MAX_INODES};
use crate::fs::error::{FsError, Result};
use crate::fs::super_block::SuperBlock;
use crate::fs::FileSystem;
use crate::shell::{command::Command, command::execute_command, parse::parse_command};

pub struct ShellConfig {
    pub disk_path: PathBuf,
    pub scratch_path: PathBuf,
}

pub fn start_shell(config: ShellConfig) {
    boot_banner();

    let fs = match open_or_create(&config) {
        Ok(fs) => fs,
        Err(e) => {
            println!("{} {}", "failed to bring up the disk:".red().bold(), e);
            return;
        }
    };

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for completion.\n"
            .bright_black()
    );

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".into());

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vdfs_history");

    let mut line_editor = Reedline::create();
    if let Ok(history) = reedline::FileBackedHistory::with_file(100, history_path) {
        line_editor = line_editor.with_history(Box::new(history));
    }

    let commands: Vec<String> = [
        "help", "ls", "create", "rm", "read", "order", "concat", "debug", "exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    line_editor =
        line_editor.with_completer(Box::new(DefaultCompleter::new_with_wordlen(commands, 2)));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{}@{}", username, hostname)),
        DefaultPromptSegment::Basic("VDFS".to_string()),
    );

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&fs, &cmd) {
                            println!("{} {}", "error:".red().bold(), e);
                        }
                        if matches!(cmd, Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "unknown command, type 'help' for the command list".yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => break,
            Err(e) => {
                println!("error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "Bye!".bright_yellow());
}

/// Mounts the image at the configured path, or formats a fresh one after
/// asking for confirmation.
fn open_or_create(config: &ShellConfig) -> Result<FileSystem<FileDisk>> {
    if FileDisk::exists(&config.disk_path) {
        let disk = FileDisk::open(&config.disk_path)?;
        return FileSystem::mount(disk, config.scratch_path.clone());
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "No virtual disk at {}. Create a {} MiB image?",
            config.disk_path.display(),
            DISK_SIZE / 1024 / 1024
        ))
        .default(true)
        .interact()
        .unwrap_or(false);
    if !confirmed {
        return Err(FsError::Io(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "disk creation declined",
        )));
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    pb.set_message("allocating disk space...");
    let disk = FileDisk::create(&config.disk_path, DISK_SIZE)?;
    pb.set_position(50);

    pb.set_message("formatting...");
    let fs = FileSystem::format(
        disk,
        SuperBlock::new(DISK_SIZE, MAX_INODES),
        config.scratch_path.clone(),
    )?;
    pb.set_position(100);
    pb.finish_with_message("ready");

    Ok(fs)
}

fn boot_banner() {
    let mut stdout = stdout();
    let _ = execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("VDFS virtual disk shell\n"),
        ResetColor
    );
}
