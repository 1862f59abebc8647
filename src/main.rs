fn main() {
    pipgraph::cli::run();
}
