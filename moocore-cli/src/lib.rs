#![allow(clippy::missing_errors_doc)]
#![allow(missing_docs)]

mod approx;
mod eaf;
mod helpers;
mod hv;
mod igd;
mod nondom;
mod rank;

use anyhow::Result;
use clap::Parser;
use enum_dispatch::enum_dispatch;
use helpers::GlobalConfiguration;
use std::process::ExitCode;

pub use helpers::Subcommand;

#[enum_dispatch(Subcommand)]
#[derive(Parser)]
pub enum SubcommandEnum {
    Approx(approx::Opts),
    Eaf(eaf::Opts),
    Hv(hv::Opts),
    Igd(igd::Opts),
    Nondom(nondom::Opts),
    Rank(rank::Opts),
}

#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    author,
    about,
    disable_help_subcommand = true,
    name = "moocore",
    version
)]
pub struct Opts {
    #[command(flatten)]
    pub configuration: GlobalConfiguration,
    #[command(subcommand)]
    pub subcommand: SubcommandEnum,
}
