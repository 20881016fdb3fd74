//! # SamaShop Demo Entry Point
//!
//! ## Startup Sequence
//! 1. Read configuration from `SAMA_*` variables
//! 2. Run the walkthrough (logging is set up inside)
//! 3. Exit non-zero with a JSON error if a step fails

use std::process::ExitCode;

use sama_demo_lib::config::DemoConfig;

fn main() -> ExitCode {
    let config = DemoConfig::from_env();

    match sama_demo_lib::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_json());
            ExitCode::FAILURE
        }
    }
}
