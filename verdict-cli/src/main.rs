//! Binary entry point for the `verdict` command.

fn main() {
    if let Err(error) = verdict_cli::run() {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}
