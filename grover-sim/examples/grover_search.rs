//! Grover search for one marked item among eight
//!
//! Marks index 5 (`101`) on a 3-qubit register, applies a single round and
//! samples 1024 shots.
//!
//! Run with: cargo run --example grover_search
//! Set `RUST_LOG=grover_sim=debug` to trace each round.

use grover_sim::{theoretical_success_probability, GroverConfig, GroverSimulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Grover Search\n");
    println!("=============\n");

    let num_qubits = 3;
    let target = 5;
    let iterations = 1;

    let config = GroverConfig::new(num_qubits, target)
        .with_iterations(iterations)
        .with_shots(1024)
        .with_seed(42)
        .with_statistics(true);

    let simulator = GroverSimulator::new(config)?;
    let result = simulator.run()?;

    println!("{}", result);
    println!(
        "Expected success probability: {:.5}",
        theoretical_success_probability(num_qubits, iterations)
    );

    match result.most_common() {
        Some((bitstring, count)) if result.found_target() => {
            println!("Found target {} ({} shots)", bitstring, count);
        }
        Some((bitstring, count)) => {
            println!(
                "Most frequent outcome {} ({} shots) is not the target {}",
                bitstring, count, result.target_bitstring
            );
        }
        None => println!("No outcomes recorded"),
    }

    Ok(())
}
