//! `slc` — standalone binary.
//!
//! Thin wrapper around [`slc::run_cli`], handling error display and exit
//! codes. All command logic lives in the library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (message printed to stderr)

fn main() {
    if let Err(e) = slc::run_cli() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
