//! `slr` CLI binary.
//!
//! This is the minimal entrypoint; all logic lives in the library crates.
//! `main` only maps a returned `ExitCode` to a process exit.

#[tokio::main]
async fn main() {
    if let Err(code) = slr::run().await {
        std::process::exit(code.as_i32());
    }
}
