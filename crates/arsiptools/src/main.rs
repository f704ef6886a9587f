#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod archive;
mod error;
mod inputs;
mod merge;
mod prelude;
mod qr;
mod rename;
mod sheet;
mod transfer;

#[cfg(test)]
mod testpdf;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Batch PDF automation for clinical and administrative archives"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "ARSIPTOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Merge matching PDF sets across folders
    Merge(crate::merge::App),

    /// Rename PDFs by extracted identifier or by filename cleanup
    Rename(crate::rename::App),

    /// Copy PDFs listed in a spreadsheet into an output folder
    Copy(crate::transfer::CopyOptions),

    /// Move PDFs listed in a spreadsheet out of their source folder
    #[clap(name = "move")]
    Move(crate::transfer::MoveOptions),

    /// QR code generation and stamping
    Qr(crate::qr::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Merge(sub_app) => crate::merge::run(sub_app, app.global).await,
        SubCommands::Rename(sub_app) => crate::rename::run(sub_app, app.global).await,
        SubCommands::Copy(options) => crate::transfer::run_copy(options, app.global).await,
        SubCommands::Move(options) => crate::transfer::run_move(options, app.global).await,
        SubCommands::Qr(sub_app) => crate::qr::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
