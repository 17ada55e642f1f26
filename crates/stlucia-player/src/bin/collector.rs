use stlucia_player::{play, Collector};

fn main() {
    std::process::exit(play(&Collector));
}
