fn main() {
    palimpsest::cli::run();
}
