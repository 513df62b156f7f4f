use std::process::ExitCode;

use drowsy::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = drowsy::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
