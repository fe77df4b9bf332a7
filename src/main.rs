use clap::Parser;
use std::process;

use dedupr::cli::{Cli, OutputFormat};
use dedupr::duplicates::EngineError;
use dedupr::error::{ExitCode, StructuredError};
use dedupr::run_app;

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.output == Some(OutputFormat::Json);

    match run_app(&cli) {
        Ok(code) => process::exit(code.as_i32()),
        Err(error) => {
            let code = match error.downcast_ref::<EngineError>() {
                Some(EngineError::Interrupted) => ExitCode::Interrupted,
                _ => ExitCode::GeneralError,
            };

            if json_errors {
                let structured = StructuredError::new(&error, code);
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("[{}] Error: {:#}", code.code_prefix(), error),
                }
            } else {
                eprintln!("[{}] Error: {:#}", code.code_prefix(), error);
            }

            process::exit(code.as_i32());
        }
    }
}
