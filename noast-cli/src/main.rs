//! noast CLI: tokenize, disassemble, and run scripts.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, or compile error
//! - 3: Runtime error

mod commands;
mod dump;
mod logger;

use std::process;

use log::LevelFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    logger::init(log_level(&args[2..]));

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "tokens" => commands::tokens(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn log_level(args: &[String]) -> LevelFilter {
    if args.iter().any(|a| a == "--logging-off") {
        LevelFilter::Off
    } else if args.iter().any(|a| a == "--verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn print_usage() {
    eprintln!("Usage: noast <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <script> [--logging-off] [--verbose]   Compile and execute a script");
    eprintln!("  tokens <script>                            List the script's tokens");
    eprintln!("  disassemble <script>                       Compile and list instructions");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --logging-off   Disable the stack dump and all log output");
    eprintln!("  --verbose       Log compiled functions, calls and returns");
}
