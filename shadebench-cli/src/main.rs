fn main() {
    if let Err(e) = shadebench_cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
