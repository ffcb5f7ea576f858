/*************************************************************************************************
 *
 * Command line options
 *
 *************************************************************************************************/

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tagseal")]
#[command(about = "Fingerprint-based integrity tags for scripts, plus a toy credential store")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a script tag carrying an integrity attribute
    Generate {
        #[arg(short, long, help = "Path to the javascript file the tag should reference")]
        src: Option<String>,

        #[arg(short, long, help = "Inline javascript to embed in the tag")]
        inline: Option<String>,
    },

    /// Verify the integrity attribute of every script tag in a document
    Verify {
        #[arg(help = "Path of the markup document to verify")]
        input: PathBuf,
    },

    /// Walk a signup and login round trip against an in-memory credential store
    Users,
}

/* *****************************************************************************************************************
 *
 * Tests
 *
 * *****************************************************************************************************************/
