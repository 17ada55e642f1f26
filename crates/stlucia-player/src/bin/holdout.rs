use stlucia_player::{play, Holdout};

fn main() {
    std::process::exit(play(&Holdout));
}
