use stlucia_player::{play, Berserker};

fn main() {
    std::process::exit(play(&Berserker));
}
