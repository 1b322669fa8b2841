use crate::error::CliError;

#[derive(Debug, clap::Parser)]
pub struct ExplainArgs {
    /// An error code such as `E0005`.
    pub code: String,
}

pub fn explain_command(args: ExplainArgs) -> Result<(), CliError> {
    match dot_error_codes::lookup(&args.code) {
        None => {
            eprintln!("No error code found for {}", args.code);
            Err(CliError::Execution)
        }
        Some(code) => {
            println!("{}", code.description.trim_end());
            Ok(())
        }
    }
}
