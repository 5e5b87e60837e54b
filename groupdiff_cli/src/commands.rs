// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use std::{
	convert::TryFrom,
	fs,
	path::{Path, PathBuf},
};

use groupdiff::{
	address::{Aci, Pni, UpdaterAddress, E164},
	groups::group_storage::GroupModelStorage,
	state::{ContactRecord, InMemoryContacts},
	DisappearingMessageToken, GroupModel, GroupUpdateItemBuilder, GroupUpdateRecords, LocalIdentifiers,
	Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

pub const AUTHOR_STR: &str = "Forest Contact team";
pub const VERSION_STR: &str = "0.2.0";

/// Describes Signal group changes as typed update items, printed as JSON.
#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "groupdiff-cli", about = "Describes Signal group changes as typed update items.", author = AUTHOR_STR, version = VERSION_STR)]
pub struct AppArgs {
	/// ACI of the local account, as a UUID.
	#[structopt(long = "local-aci")]
	pub local_aci: Aci,

	/// PNI of the local account, as "PNI:<uuid>".
	#[structopt(long = "local-pni")]
	pub local_pni: Option<Pni>,

	/// Phone number of the local account, in E164 format (for example +12345678910).
	#[structopt(long = "local-e164")]
	pub local_e164: Option<E164>,

	/// JSON file holding a list of known contacts, used to resolve display names
	/// and to match phone numbers to accounts.
	#[structopt(long, parse(from_os_str))]
	pub contacts: Option<PathBuf>,

	/// Log at debug level unless RUST_LOG says otherwise.
	#[structopt(short, long)]
	pub verbose: bool,

	#[structopt(subcommand)]
	pub command: GroupDiffCommand,
}

#[derive(StructOpt, Serialize, Deserialize, Debug, Clone)]
#[structopt(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub enum GroupDiffCommand {
	/// Diffs two snapshots of a group and prints what changed.
	Diff(DiffCommand),
	/// Prints the items for a group we have only just seen for the first time.
	NewGroup(NewGroupCommand),
	/// Expands previously stored update records into update items.
	Translate(TranslateCommand),
	/// Prints the single generic item used when there is nothing to diff.
	DefaultItem(UpdaterArgs),
}

/// Who made a change, as far as the caller knows.
#[derive(StructOpt, Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdaterArgs {
	/// Address of whoever made the change: an ACI, "PNI:<uuid>", or an E164 phone number.
	#[structopt(short, long)]
	#[serde(default)]
	pub updater: Option<UpdaterAddress>,

	/// The change is known to have been made by the local user, whatever --updater says.
	#[structopt(long = "known-local")]
	#[serde(default)]
	pub known_local: bool,
}

#[derive(StructOpt, Serialize, Deserialize, Debug, Clone)]
pub struct DiffCommand {
	/// Group snapshot from before the change, as JSON.
	#[structopt(long, parse(from_os_str))]
	pub old: PathBuf,

	/// Group snapshot from after the change, as JSON.
	#[structopt(long, parse(from_os_str))]
	pub new: PathBuf,

	/// Disappearing message timer before the change, in seconds. 0 means disabled.
	/// Leave out when the old timer isn't known.
	#[structopt(long = "old-timer")]
	#[serde(default)]
	pub old_timer: Option<u32>,

	/// Disappearing message timer after the change, in seconds. 0 means disabled.
	#[structopt(long = "new-timer")]
	#[serde(default)]
	pub new_timer: Option<u32>,

	/// Only describe the local user's own membership change.
	#[structopt(long = "local-only")]
	#[serde(default)]
	pub local_only: bool,

	/// Print the storable records rather than update items.
	#[structopt(long)]
	#[serde(default)]
	pub records: bool,

	#[structopt(flatten)]
	#[serde(flatten)]
	pub updater: UpdaterArgs,
}

#[derive(StructOpt, Serialize, Deserialize, Debug, Clone)]
pub struct NewGroupCommand {
	/// Group snapshot, as JSON.
	#[structopt(long, parse(from_os_str))]
	pub new: PathBuf,

	/// Disappearing message timer of the group, in seconds. 0 means disabled.
	#[structopt(long = "new-timer")]
	#[serde(default)]
	pub new_timer: Option<u32>,

	/// Print the storable records rather than update items.
	#[structopt(long)]
	#[serde(default)]
	pub records: bool,

	#[structopt(flatten)]
	#[serde(flatten)]
	pub updater: UpdaterArgs,
}

#[derive(StructOpt, Serialize, Deserialize, Debug, Clone)]
pub struct TranslateCommand {
	/// JSON file holding a list of stored update records.
	#[structopt(parse(from_os_str))]
	pub records: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	#[error("Could not read {path}: {source}")]
	ReadFile {
		path: String,
		source: std::io::Error,
	},
	#[error("Could not parse {path} as JSON: {source}")]
	ParseFile {
		path: String,
		source: serde_json::Error,
	},
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> std::result::Result<T, CommandError> {
	let contents = fs::read_to_string(path).map_err(|source| CommandError::ReadFile {
		path: path.display().to_string(),
		source,
	})?;
	serde_json::from_str(&contents).map_err(|source| CommandError::ParseFile {
		path: path.display().to_string(),
		source,
	})
}

pub fn load_group_model(path: &Path) -> Result<GroupModel> {
	let storage: GroupModelStorage = read_json(path)?;
	let model = GroupModel::try_from(storage)?;
	debug!(
		"Loaded revision {} of group {} from {}",
		model.revision,
		model.group_id.to_base64(),
		path.display()
	);
	Ok(model)
}

pub fn load_contacts(args: &AppArgs) -> Result<InMemoryContacts> {
	let local_identifiers = LocalIdentifiers::new(args.local_aci, args.local_pni, args.local_e164.clone());
	let contacts: Vec<ContactRecord> = match &args.contacts {
		Some(path) => read_json(path)?,
		None => Vec::default(),
	};
	debug!("Loaded {} contacts.", contacts.len());
	Ok(InMemoryContacts::with_contacts(local_identifiers, contacts))
}

fn timer(seconds: Option<u32>) -> Option<DisappearingMessageToken> {
	seconds.map(DisappearingMessageToken::from_duration)
}

pub fn handle_diff_command(cmd: &DiffCommand, contacts: &InMemoryContacts) -> Result<serde_json::Value> {
	let old_model = load_group_model(&cmd.old)?;
	let new_model = load_group_model(&cmd.new)?;
	let builder = GroupUpdateItemBuilder::new(contacts, contacts);
	let hint = cmd.updater.updater.as_ref();

	let records = builder.records_by_models(
		&old_model,
		&new_model,
		timer(cmd.old_timer),
		timer(cmd.new_timer),
		hint,
		cmd.updater.known_local,
		cmd.local_only,
	);
	if cmd.records {
		return Ok(serde_json::to_value(GroupUpdateRecords::from(records))?);
	}
	let items = builder.translate_precomputed(&records, &contacts.local_identifiers);
	Ok(serde_json::to_value(items)?)
}

pub fn handle_new_group_command(cmd: &NewGroupCommand, contacts: &InMemoryContacts) -> Result<serde_json::Value> {
	let new_model = load_group_model(&cmd.new)?;
	let builder = GroupUpdateItemBuilder::new(contacts, contacts);

	let records = builder.records_for_new_group(
		&new_model,
		timer(cmd.new_timer),
		cmd.updater.updater.as_ref(),
		cmd.updater.known_local,
	);
	if cmd.records {
		return Ok(serde_json::to_value(GroupUpdateRecords::from(records))?);
	}
	let items = builder.translate_precomputed(&records, &contacts.local_identifiers);
	Ok(serde_json::to_value(items)?)
}

pub fn handle_translate_command(cmd: &TranslateCommand, contacts: &InMemoryContacts) -> Result<serde_json::Value> {
	let records: GroupUpdateRecords = read_json(&cmd.records)?;
	let builder = GroupUpdateItemBuilder::new(contacts, contacts);
	let items = builder.translate_precomputed(&records.0, &contacts.local_identifiers);
	Ok(serde_json::to_value(items)?)
}

pub fn handle_default_item_command(cmd: &UpdaterArgs, contacts: &InMemoryContacts) -> Result<serde_json::Value> {
	let builder = GroupUpdateItemBuilder::new(contacts, contacts);
	let item = builder.default_item(cmd.updater.as_ref(), cmd.known_local);
	Ok(serde_json::to_value(item)?)
}
