fn main() {
    env_logger::init();

    if let Err(err) = geosql_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
