fn main() {
    soundshift::cli::run();
}
