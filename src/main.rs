use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = link_display::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
