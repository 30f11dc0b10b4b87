use std::process::ExitCode;

fn main() -> ExitCode {
    pdf_organizer_lib::run()
}
