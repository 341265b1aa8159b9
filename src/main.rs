use std::process::ExitCode;

fn main() -> ExitCode {
    match ofc_model::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ofc: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
