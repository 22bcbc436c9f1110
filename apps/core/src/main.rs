fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(error) = tabfind_core::runtime::run_cli(&args) {
        eprintln!("[tabfind] runtime failed: {error}");
        std::process::exit(1);
    }
}
