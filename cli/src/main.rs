//! Binary entrypoint for smartguide-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = smartguide_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
