use clap::{Parser, Subcommand};
use sanctuary_license::Plan;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sanctuary")]
#[command(about = "Package and open encrypted Sanctuary links")]
pub struct Cli {
    /// Viewer origin the link points at
    #[arg(long, global = true, env = "SANCTUARY_ORIGIN")]
    pub origin: Option<String>,

    /// PBKDF2 iterations for the passcode tier
    #[arg(long, global = true, env = "SANCTUARY_KDF_ITERATIONS")]
    pub kdf_iterations: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encrypt a configuration file into a shareable link
    Package {
        /// Configuration JSON file
        #[arg(long)]
        config: PathBuf,
    },
    /// Decrypt a link and print its configuration
    Open {
        /// Full link, including the `#key` fragment
        url: String,

        /// Passcode for the notes and video tier
        #[arg(long)]
        passcode: Option<String>,
    },
    /// List the uploaded photos and videos a link refers to
    Assets {
        /// Full link, including the `#key` fragment
        url: String,

        /// Passcode, to include the video of a locked sanctuary
        #[arg(long)]
        passcode: Option<String>,
    },
    /// Sign a plan for a couple (secret from SANCTUARY_SIGNING_SECRET)
    Sign {
        #[arg(long)]
        plan: Plan,
        #[arg(long)]
        name_a: String,
        #[arg(long)]
        name_b: String,
    },
    /// Check a premium signature (secret from SANCTUARY_SIGNING_SECRET)
    Verify {
        #[arg(long)]
        plan: Plan,
        #[arg(long)]
        name_a: String,
        #[arg(long)]
        name_b: String,
        #[arg(long)]
        signature: String,
    },
}
