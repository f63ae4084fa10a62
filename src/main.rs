use std::path::PathBuf;

use clap::Parser;

use crate::shell::{start_shell, ShellConfig};

mod disk;
mod fs;
mod shell;

#[derive(Parser)]
#[command(about = "A minimal file system emulated inside a fixed-size disk image")]
struct Cli {
    /// Path of the virtual disk image
    #[arg(long, default_value = fs::config::DEFAULT_DISK_PATH)]
    disk: PathBuf,

    /// Path of the scratch paging file used by the order command
    #[arg(long, default_value = fs::config::DEFAULT_SCRATCH_PATH)]
    scratch: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    start_shell(ShellConfig {
        disk_path: cli.disk,
        scratch_path: cli.scratch,
    });
}
