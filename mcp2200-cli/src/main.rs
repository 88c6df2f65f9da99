use anyhow::Context;
use clap::Parser;
use hidapi::HidApi;

use cli::Commands;

mod cli;
mod configure;
mod eeprom;
mod gpio;
mod usb;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let api = HidApi::new().context("could not initialise the HID library")?;
    let open = || usb::open(&api, &cli.target);
    match cli.command {
        Commands::List => usb::list(&api, &cli.target)?,
        Commands::Get => gpio::get(&open()?)?,
        Commands::Set { values } => gpio::set(&open()?, values)?,
        Commands::Configure(args) => configure::action(&open()?, args)?,
        Commands::Describe(args) => usb::describe(&open()?, &cli.target, args)?,
        Commands::GetEeprom { address } => eeprom::get(&open()?, address)?,
        Commands::SetEeprom { address, value } => eeprom::set(&open()?, address, value)?,
    }
    Ok(())
}

/// Warnings by default, debug with --verbose. RUST_LOG overrides both.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
