fn main() {
    if let Err(e) = workmode::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
