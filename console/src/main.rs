mod create;
mod info;
mod plan;
mod read;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use console::style;
use create::CreateArgs;
use info::InfoArgs;
use plan::PlanArgs;
use read::ReadArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Print extents and element type of a raw array file.
    Info {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  InfoArgs,
    },

    /// Validate a selection and print what reading it would involve.
    Plan {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  PlanArgs,
    },

    /// Read a selection and print the values.
    Read {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ReadArgs,
    },

    /// Write a raw array file filled with its own linear indices.
    Create {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CreateArgs,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        MainMenu::Info { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Plan { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Read { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Create { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
    }
    Ok(())
}

fn main() {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
