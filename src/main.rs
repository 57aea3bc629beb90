fn main() {
    if let Err(err) = csv_table::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
