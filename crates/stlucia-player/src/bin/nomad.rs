use stlucia_player::{play, Nomad};

fn main() {
    std::process::exit(play(&Nomad));
}
