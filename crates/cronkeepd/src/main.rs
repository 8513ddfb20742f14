use std::process::ExitCode;

fn main() -> ExitCode {
    match cronkeepd::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("cronkeepd: {error}");
            ExitCode::FAILURE
        }
    }
}
