#![forbid(unsafe_code)]

//! capwatch: capture watchdog CLI entry point.

use clap::Parser;

use capture_watchdog::logger::console;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    match cli_app::run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let label = if e.is_startup() {
                "capwatch: configuration error:"
            } else {
                "capwatch:"
            };
            console::critical(&format!("{label} {e}"));
            std::process::exit(1);
        }
    }
}
