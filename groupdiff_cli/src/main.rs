// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use groupdiff::Result;
use log::debug;
use structopt::StructOpt;

pub mod commands;

use crate::commands::*;

pub fn main() -> Result<()> {
	let args = AppArgs::from_args();

	let default_filter = if args.verbose { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

	let contacts = load_contacts(&args)?;
	debug!("Running {:?} as {}", args.command, args.local_aci);

	let output = match &args.command {
		GroupDiffCommand::Diff(cmd) => handle_diff_command(cmd, &contacts)?,
		GroupDiffCommand::NewGroup(cmd) => handle_new_group_command(cmd, &contacts)?,
		GroupDiffCommand::Translate(cmd) => handle_translate_command(cmd, &contacts)?,
		GroupDiffCommand::DefaultItem(cmd) => handle_default_item_command(cmd, &contacts)?,
	};
	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
