fn main() {
    if let Err(e) = sortme_client::init::main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
