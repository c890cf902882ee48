//! End-to-End Session Circuit Example
//!
//! This example walks the full pipeline over a captured TLS 1.3 session:
//! 1. Derive the server application traffic key from the handshake mid-state
//! 2. Bind the key to the record's authentication-tag ECB blocks
//! 3. Prove the decrypted record carries a "price" above a threshold
//!
//! The circuit is checked for satisfiability with the in-process witness
//! builder; attaching a proving backend is a separate concern.

use zktls_circuits::evaluate::demo_session;
use zktls_circuits::{Oracle, Visibility, WitnessBuilder};

fn main() {
    println!("=== TLS 1.3 Oracle Circuit Example ===\n");

    let session = demo_session().expect("demo vectors are well-formed");
    println!("Captured session loaded");
    println!("  Record bytes:  {}", session.plaintext.len());
    println!("  Chunk index:   {}", session.statement.chunk_index);
    println!("  Label offset:  {}", session.statement.substring_start);
    println!("  Threshold:     {}", session.statement.threshold);

    let circuit = Oracle {
        kdc: session.kdc,
        tag: session.tag,
        plaintext: session.plaintext,
        statement: session.statement,
    };

    println!("\nDefining circuit...");
    let start = std::time::Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api).expect("demo shape is valid");
    let build_time = start.elapsed();

    println!("Circuit defined");
    println!("  Time:           {:?}", build_time);
    println!("  Constraints:    {}", api.num_constraints());
    println!("  Variables:      {}", api.num_variables());
    println!("  Public inputs:  {}", api.count_of(Visibility::Public));
    println!("  Private inputs: {}", api.count_of(Visibility::Private));

    match api.check() {
        Ok(()) => println!("\nAll constraints satisfied"),
        Err(e) => println!("\nUnsatisfied: {e}"),
    }
}
