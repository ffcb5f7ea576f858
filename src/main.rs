#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod credentials;
mod hashing;
mod integrity;
mod opt;
mod table;
mod tags;

use std::path::Path;
use std::{fs, process};

use clap::Parser;

use crate::opt::{Command, Opt};

fn main() {
    env_logger::init();
    let opt = Opt::parse();

    let outcome = match opt.command {
        Command::Generate { src, inline } => generate(src.as_deref(), inline.as_deref()),
        Command::Verify { input } => verify(&input),
        Command::Users => users(),
    };

    if let Err(message) = outcome {
        error!("{}", message);
        process::exit(1);
    }
}

fn generate(src: Option<&str>, inline: Option<&str>) -> Result<(), String> {
    let tag = integrity::generate(src, inline).map_err(|error| error.to_string())?;
    println!("{}", tag);
    Ok(())
}

fn verify(input: &Path) -> Result<(), String> {
    let markup = fs::read_to_string(input)
        .map_err(|error| format!("{}: {}", input.display(), error))?;
    integrity::verify_document(&markup).map_err(|error| error.to_string())?;
    info!("Every declared digest in {} matches", input.display());
    Ok(())
}

// Mirrors the credential flow end to end: a fresh store, one signup, one login.
fn users() -> Result<(), String> {
    let mut store = credentials::CredentialStore::new();
    store
        .signup("Jamie", "j-amy23", "jamie@canada.gov", 23, "ilovekittens23")
        .map_err(|error| error.to_string())?;
    let user = store
        .login("j-amy23", "ilovekittens23")
        .map_err(|error| error.to_string())?;
    println!("Logged in: {} <{}>", user.name, user.email);
    Ok(())
}
