mod cli;

use clap::Parser;
use cli::{Cli, Command};
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};
use uboot_env::{CommentMode, Layout};
use uboot_env_util::{EnvPatcher, LogReporter, PatchOptions};

/// Top-level application errors for uboot-envtool.
#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to extract environment"))]
    Extract { source: uboot_env_util::PatchError },

    #[snafu(display("failed to insert environment"))]
    Insert { source: uboot_env_util::PatchError },

    #[snafu(display("failed to inspect image"))]
    Info { source: uboot_env_util::PatchError },
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[snafu::report]
fn main() -> Result<()> {
    let cli = Cli::parse();

    pretty_env_logger::formatted_builder()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let comments = if cli.strip_comments {
        CommentMode::Strip
    } else {
        CommentMode::Preserve
    };
    let options = PatchOptions {
        layout: Layout::PINENOTE,
        comments,
    };
    let patcher = EnvPatcher::new(options, LogReporter);

    match cli.command {
        Command::Extract { image, output } => {
            patcher.extract(&image, &output).context(ExtractSnafu)?;
        }
        Command::Insert { image, env, output } => {
            let image = (!image.is_empty()).then(|| PathBuf::from(image));
            patcher
                .insert(image.as_deref(), &env, &output)
                .context(InsertSnafu)?;
        }
        Command::Info { image } => cmd_info(&patcher, &image)?,
    }

    Ok(())
}

fn cmd_info(patcher: &EnvPatcher<LogReporter>, path: &Path) -> Result<()> {
    let info = patcher.inspect(path).context(InfoSnafu)?;
    let layout = info.layout;

    println!("Image: {}", path.display());
    println!();
    println!("Image Size:     0x{:X} (x2)", layout.image_size());
    println!(
        "U-Boot:         0x{:X} (0x{:X} bytes)",
        layout.uboot_offset(),
        layout.uboot_size()
    );
    println!(
        "Environment:    0x{:X} (0x{:X} bytes, in U-Boot)",
        layout.env_offset(),
        layout.env_size()
    );
    println!("U-Boot SHA-256: {}", info.digest);

    match info.hash {
        Some(hash) => {
            println!("Hash Offset:    0x{:X}", hash.offset);
            if let Some(second) = hash.duplicate {
                println!("  Duplicate:    0x{:X}", second);
            }
        }
        None => println!("Hash Offset:    (not found)"),
    }

    println!("Env Lines:      {}", info.env.len());
    println!(
        "Env Usage:      {} / {} bytes",
        info.env.encoded_len(),
        layout.env_size()
    );

    Ok(())
}
