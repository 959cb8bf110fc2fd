use eval_hands::cli;

fn main() {
    cli::run();
}
