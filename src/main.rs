use colored::Colorize;
use gif_spritesheet::command;
use std::process;

fn main() {
    if let Err(err) = command::args_handle() {
        eprintln!("{} {}", "error:".red(), err);
        process::exit(err.exit_code());
    }
}
