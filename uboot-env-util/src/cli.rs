use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "uboot-envtool", version)]
#[command(about = "Extract and modify the default environment in a PineNote U-Boot image")]
#[command(
    long_about = "Extracts and modifies the default environment in a PineNote U-Boot image. \
The environment is turned from a series of null-terminated lines into a plain-text \
file that can be easily modified and re-inserted.\n\n\
This program is provided with no guarantees or warranty. Use at your own risk!"
)]
#[command(
    after_help = "Arguments per command: extract takes 2 (IMAGE ENV_FILE), insert takes 3 \
(IMAGE ENV_FILE OUTPUT), info takes 1 (IMAGE). Flags go before the command."
)]
pub struct Cli {
    /// Print debug messages
    #[arg(short, long)]
    pub debug: bool,

    /// Print informational messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Drop `#` comments and surrounding whitespace when inserting
    #[arg(short, long)]
    pub strip_comments: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns the log level selected by the flags.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the default environment to a text file
    Extract {
        /// Path to the U-Boot image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Path of the environment text file to write
        #[arg(value_name = "ENV_FILE")]
        output: PathBuf,
    },

    /// Insert a new default environment
    Insert {
        /// Path to the source U-Boot image (empty to patch OUTPUT in place)
        #[arg(value_name = "IMAGE")]
        image: OsString,

        /// Path to the environment text file
        #[arg(value_name = "ENV_FILE")]
        env: PathBuf,

        /// Path of the U-Boot image to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Display information about a U-Boot image
    Info {
        /// Path to the U-Boot image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}
