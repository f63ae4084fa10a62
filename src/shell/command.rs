use colored::*;

use crate::disk::FileDisk;
use crate::fs::error::Result;
use crate::fs::FileSystem;
use crate::shell::debug;

#[derive(Debug)]
pub enum Command {
    Help,
    Ls,
    Create(String, u64),
    Rm(String),
    Read(String, i64, i64),
    Order(String),
    Concat(String, String, String),
    Debug(DebugTarget),
    Exit,
}

#[derive(Debug)]
pub enum DebugTarget {
    Super,
    Bitmap,
    Inodes,
}

pub fn execute_command(fs: &FileSystem<FileDisk>, cmd: &Command) -> Result<()> {
    match cmd {
        Command::Help => print_help(),
        Command::Ls => {
            let (inodes, total) = fs.list_files()?;
            if inodes.is_empty() {
                println!("{}", "no files".bright_black());
            } else {
                for inode in &inodes {
                    println!(
                        "  {:<32} {:>12} elements  {:>14} bytes",
                        inode.name().green(),
                        inode.size,
                        inode.byte_len()
                    );
                }
                println!(
                    "{} files, {} elements used in total",
                    inodes.len(),
                    total.to_string().cyan()
                );
            }
        }
        Command::Create(name, size) => {
            fs.create_file(name, *size)?;
            println!("created {} with {} elements", name.green(), size);
        }
        Command::Rm(name) => {
            fs.remove_file(name)?;
            println!("removed {}", name.red());
        }
        Command::Read(name, start, end) => {
            let values = fs.read_file(name, *start, *end)?;
            print_values(&values);
            println!("{} values", values.len().to_string().cyan());
        }
        Command::Order(name) => {
            let took = fs.order_file(name)?;
            println!("ordered {} in {:.3?}", name.green(), took);
        }
        Command::Concat(a, b, new_name) => {
            fs.concat_files(a, b, new_name)?;
            println!("concatenated {} + {} into {}", a, b, new_name.green());
        }
        Command::Debug(target) => match target {
            DebugTarget::Super => debug::print_super_block(fs),
            DebugTarget::Bitmap => debug::print_bitmap(fs)?,
            DebugTarget::Inodes => debug::print_inode_table(fs)?,
        },
        Command::Exit => {}
    }

    Ok(())
}

fn print_values(values: &[i32]) {
    for line in values.chunks(10) {
        let rendered: Vec<String> = line.iter().map(|v| v.to_string()).collect();
        println!("  {}", rendered.join(" "));
    }
}

fn print_help() {
    println!("{}", "VDFS commands".bright_cyan().bold());
    println!(
        "{}",
        "
  create <file> <elems>   Create a file filled with <elems> random integers
  rm <file>               Remove a file
  ls                      List files and total space used
  read <file> <s> <e>     Print elements s..e of a file
  order <file>            Sort a file's contents through the paging file
  concat <a> <b> <new>    Join two files into a new one
  debug <super|bitmap|inodes>
                          Inspect on-disk structures
  help                    Show this help message
  exit                    Quit the shell
"
        .bright_black()
    );
}
