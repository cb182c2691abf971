fn main() {
    if let Err(err) = archtour::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
