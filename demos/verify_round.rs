use fairseed::{FairRng, verify_commitment};

fn main() {
    // Example end-to-end round
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let mut rng = FairRng::new(server_seed, client_seed, 0).expect("seed configuration");

    // Publish the commitment before any outcome is drawn.
    let commitment = rng.server_seed_hash_hex().to_string();

    let crash = rng.crash(1.0, 1000.0).expect("crash parameters");
    rng.advance();
    let roll = rng.next_int(1, 6).expect("die range");

    println!("server_seed_hash={commitment} crash={crash} roll={roll}");

    // Round over: reveal the seed so the player can check the commitment.
    let revealed = rng.reveal_server_seed();
    println!(
        "revealed={revealed} verified={}",
        verify_commitment(revealed, &commitment)
    );
}
