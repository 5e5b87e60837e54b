// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use serde::{Deserialize, Serialize};

use crate::{
	address::{Aci, Pni, ServiceId, E164},
	LocalIdentifiers,
};

/// Display name used when nothing at all is known about a user.
pub const UNKNOWN_USER_NAME: &str = "Unknown";

/// Resolves display names for group update items.
/// Lookups are read-only; a name may change between two calls as contacts change.
pub trait ContactsManager {
	fn display_name(&self, service_id: &ServiceId) -> String;
}

/// Read-only view of the recipients we know about, used to tidy up actor hints before diffing.
pub trait RecipientStore {
	/// Best-effort resolution of a phone number alias to a stable account identity.
	fn aci_for_e164(&self, phone_number: &E164) -> Option<Aci>;
	/// The identities of this device's own account.
	fn local_identifiers(&self) -> LocalIdentifiers;
}

/// One known contact. Any of the name fields may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
	pub aci: Option<Aci>,
	#[serde(default)]
	pub pni: Option<Pni>,
	#[serde(default)]
	pub e164: Option<E164>,
	/// Name from the system address book.
	#[serde(default)]
	pub given_name: Option<String>,
	#[serde(default)]
	pub family_name: Option<String>,
	/// Name from the contact's own Signal profile.
	#[serde(default)]
	pub profile_name: Option<String>,
}

impl ContactRecord {
	pub fn matches(&self, service_id: &ServiceId) -> bool {
		match service_id {
			ServiceId::Aci(aci) => self.aci.as_ref() == Some(aci),
			ServiceId::Pni(pni) => self.pni.as_ref() == Some(pni),
		}
	}

	/// Prefers the system contact name, then the profile name, then the phone number.
	pub fn display_name(&self) -> Option<String> {
		let non_empty = |s: &Option<String>| {
			s.as_deref()
				.map(str::trim)
				.filter(|s| !s.is_empty())
				.map(String::from)
		};
		let system_name = match (non_empty(&self.given_name), non_empty(&self.family_name)) {
			(Some(given), Some(family)) => Some(format!("{} {}", given, family)),
			(Some(given), None) => Some(given),
			(None, Some(family)) => Some(family),
			(None, None) => None,
		};
		system_name
			.or_else(|| non_empty(&self.profile_name))
			.or_else(|| non_empty(&self.e164))
	}
}

/// Basic in-memory implementation of both collaborator traits.
#[derive(Clone, Debug)]
pub struct InMemoryContacts {
	pub local_identifiers: LocalIdentifiers,
	pub contacts: Vec<ContactRecord>,
}

impl InMemoryContacts {
	pub fn new(local_identifiers: LocalIdentifiers) -> Self {
		InMemoryContacts {
			local_identifiers,
			contacts: Vec::default(),
		}
	}

	pub fn with_contacts(local_identifiers: LocalIdentifiers, contacts: Vec<ContactRecord>) -> Self {
		InMemoryContacts {
			local_identifiers,
			contacts,
		}
	}

	pub fn push(&mut self, contact: ContactRecord) {
		self.contacts.push(contact);
	}

	pub fn get(&self, service_id: &ServiceId) -> Option<&ContactRecord> {
		self.contacts.iter().find(|c| c.matches(service_id))
	}

	pub fn get_by_number(&self, phone_number: &str) -> Option<&ContactRecord> {
		self.contacts
			.iter()
			.find(|c| c.e164.as_deref() == Some(phone_number))
	}
}

impl ContactsManager for InMemoryContacts {
	fn display_name(&self, service_id: &ServiceId) -> String {
		self.get(service_id)
			.and_then(ContactRecord::display_name)
			.unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
	}
}

impl RecipientStore for InMemoryContacts {
	fn aci_for_e164(&self, phone_number: &E164) -> Option<Aci> {
		if self.local_identifiers.contains_e164(phone_number) {
			return Some(self.local_identifiers.aci);
		}
		self.get_by_number(phone_number).and_then(|c| c.aci)
	}

	fn local_identifiers(&self) -> LocalIdentifiers {
		self.local_identifiers.clone()
	}
}
