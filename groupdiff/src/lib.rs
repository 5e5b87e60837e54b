// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

//! Turns "before" and "after" snapshots of a Signal group, or lists of
//! previously persisted change records, into ordered lists of typed group
//! update items.

use std::error::Error;

use address::{Aci, Pni, ServiceId, UpdaterAddress, E164};
use serde::{Deserialize, Serialize};

pub mod address;
pub mod groups;
pub mod state;
pub mod utils;

pub use groups::{
	builder::GroupUpdateItemBuilder,
	update_item::{GroupUpdateItem, NamedUser},
	update_record::{GroupUpdateRecord, GroupUpdateRecords, LegacyGroupUpdateRecord},
	update_source::{GroupUpdateSource, UpdateSource},
	DisappearingMessageToken, GroupModel,
};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Every identity the local account may show up under in a group.
///
/// The PNI here is the account's *current* PNI. PNIs change with phone numbers, so a match
/// against an old group snapshot only says the PNI matches ours today.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalIdentifiers {
	pub aci: Aci,
	pub pni: Option<Pni>,
	pub e164: Option<E164>,
}

impl LocalIdentifiers {
	pub fn new(aci: Aci, pni: Option<Pni>, e164: Option<E164>) -> Self {
		LocalIdentifiers { aci, pni, e164 }
	}

	pub fn aci_service_id(&self) -> ServiceId {
		ServiceId::Aci(self.aci)
	}

	pub fn pni_service_id(&self) -> Option<ServiceId> {
		self.pni.map(ServiceId::Pni)
	}

	/// True if the service ID is our ACI or our current PNI.
	pub fn contains(&self, service_id: &ServiceId) -> bool {
		match service_id {
			ServiceId::Aci(aci) => *aci == self.aci,
			ServiceId::Pni(pni) => self.pni.as_ref() == Some(pni),
		}
	}

	pub fn contains_e164(&self, phone_number: &str) -> bool {
		self.e164.as_deref() == Some(phone_number)
	}

	pub fn contains_address(&self, address: &UpdaterAddress) -> bool {
		match address {
			UpdaterAddress::Phone(p) => self.contains_e164(p),
			UpdaterAddress::ServiceId(id) => self.contains(id),
		}
	}
}
