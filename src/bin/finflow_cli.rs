use std::process::ExitCode;

fn main() -> ExitCode {
    finflow_core::init();
    match finflow_core::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            finflow_core::cli::output::error(&err);
            ExitCode::FAILURE
        }
    }
}
