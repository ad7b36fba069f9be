// Tue Feb 17 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(e) = linkmap_analyzer::ui::cli::run() {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}
