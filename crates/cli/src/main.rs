use std::process::ExitCode;

fn main() -> ExitCode {
    speakmark_cli::run()
}
