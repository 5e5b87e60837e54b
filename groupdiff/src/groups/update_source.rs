// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use serde::{Deserialize, Serialize};

use crate::{
	address::{Aci, Pni, ServiceId, UpdaterAddress, E164},
	state::RecipientStore,
	LocalIdentifiers,
};

/// Who we believe made a group change, with as much detail as we were given.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupUpdateSource {
	/// Nothing was said about who made the change.
	Unknown,
	/// Legacy updates name their author by phone number.
	LegacyE164(E164),
	Aci(Aci),
	/// A PNI can only author one kind of change: declining its own invite.
	RejectedInviteToPni(Pni),
	/// The local user made the change, under whatever identity the change named.
	LocalUser { original_source: Box<GroupUpdateSource> },
}

/// Attribution of a change, as far as update items care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateSource {
	LocalUser,
	OtherUser(Aci),
	Unknown,
}

impl GroupUpdateSource {
	/// Source as given, before any comparison with the local user.
	pub fn from_hint(hint: Option<&UpdaterAddress>) -> Self {
		match hint {
			None => GroupUpdateSource::Unknown,
			Some(UpdaterAddress::Phone(p)) => GroupUpdateSource::LegacyE164(p.clone()),
			Some(UpdaterAddress::ServiceId(ServiceId::Aci(aci))) => GroupUpdateSource::Aci(*aci),
			Some(UpdaterAddress::ServiceId(ServiceId::Pni(pni))) => {
				GroupUpdateSource::RejectedInviteToPni(*pni)
			}
		}
	}

	/// Resolve an actor hint once, up front, for a whole diff.
	///
	/// Phone numbers are swapped for the ACI they belong to when we know it. After that,
	/// `known_local` or a hint naming any local identity makes this a local-user source.
	pub fn resolve<R: RecipientStore + ?Sized>(
		hint: Option<&UpdaterAddress>,
		known_local: bool,
		local_identifiers: &LocalIdentifiers,
		recipients: &R,
	) -> Self {
		let source = Self::from_hint(hint).sanitize(recipients);
		if known_local || source.names_local_user(local_identifiers) {
			GroupUpdateSource::LocalUser {
				original_source: Box::new(source),
			}
		} else {
			source
		}
	}

	/// Replace a phone number source with the matching ACI, if there is one.
	pub fn sanitize<R: RecipientStore + ?Sized>(self, recipients: &R) -> Self {
		match self {
			GroupUpdateSource::LegacyE164(phone_number) => match recipients.aci_for_e164(&phone_number) {
				Some(aci) => GroupUpdateSource::Aci(aci),
				None => GroupUpdateSource::LegacyE164(phone_number),
			},
			GroupUpdateSource::LocalUser { original_source } => GroupUpdateSource::LocalUser {
				original_source: Box::new(original_source.sanitize(recipients)),
			},
			other => other,
		}
	}

	fn names_local_user(&self, local_identifiers: &LocalIdentifiers) -> bool {
		match self {
			GroupUpdateSource::Unknown => false,
			GroupUpdateSource::LegacyE164(p) => local_identifiers.contains_e164(p),
			GroupUpdateSource::Aci(aci) => *aci == local_identifiers.aci,
			GroupUpdateSource::RejectedInviteToPni(pni) => local_identifiers.pni.as_ref() == Some(pni),
			GroupUpdateSource::LocalUser { .. } => true,
		}
	}

	pub fn is_local_user(&self) -> bool {
		matches!(self, GroupUpdateSource::LocalUser { .. })
	}

	pub fn attribution(&self) -> UpdateSource {
		match self {
			GroupUpdateSource::LocalUser { .. } => UpdateSource::LocalUser,
			GroupUpdateSource::Aci(aci) => UpdateSource::OtherUser(*aci),
			GroupUpdateSource::RejectedInviteToPni(_)
			| GroupUpdateSource::LegacyE164(_)
			| GroupUpdateSource::Unknown => UpdateSource::Unknown,
		}
	}

	/// The source with any local-user wrapping removed.
	pub fn original_source(&self) -> &GroupUpdateSource {
		match self {
			GroupUpdateSource::LocalUser { original_source } => original_source.original_source(),
			other => other,
		}
	}

	/// The identity that made the change, if the change named one.
	pub fn updater_address(&self) -> Option<UpdaterAddress> {
		match self.original_source() {
			GroupUpdateSource::Aci(aci) => Some(UpdaterAddress::from(*aci)),
			GroupUpdateSource::RejectedInviteToPni(pni) => Some(UpdaterAddress::from(*pni)),
			GroupUpdateSource::LegacyE164(p) => Some(UpdaterAddress::Phone(p.clone())),
			GroupUpdateSource::Unknown | GroupUpdateSource::LocalUser { .. } => None,
		}
	}

	pub fn updater_service_id(&self) -> Option<ServiceId> {
		self.updater_address().and_then(|addr| addr.service_id())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::state::{ContactRecord, InMemoryContacts};
	use uuid::Uuid;

	fn local() -> LocalIdentifiers {
		LocalIdentifiers::new(
			Aci::from_uuid(Uuid::new_v4()),
			Some(Pni::from_uuid(Uuid::new_v4())),
			Some("+15550000000".to_string()),
		)
	}

	#[test]
	fn resolve_sources() {
		let local = local();
		let alice = Aci::from_uuid(Uuid::new_v4());
		let mut contacts = InMemoryContacts::new(local.clone());
		contacts.push(ContactRecord {
			aci: Some(alice),
			e164: Some("+15551234567".to_string()),
			..Default::default()
		});

		let none = GroupUpdateSource::resolve(None, false, &local, &contacts);
		assert_eq!(none, GroupUpdateSource::Unknown);
		assert_eq!(none.attribution(), UpdateSource::Unknown);

		let other = GroupUpdateSource::resolve(Some(&alice.into()), false, &local, &contacts);
		assert_eq!(other.attribution(), UpdateSource::OtherUser(alice));

		// A phone number we know collapses onto its ACI.
		let by_phone = GroupUpdateSource::resolve(
			Some(&UpdaterAddress::Phone("+15551234567".to_string())),
			false,
			&local,
			&contacts,
		);
		assert_eq!(by_phone, GroupUpdateSource::Aci(alice));

		let unknown_phone = GroupUpdateSource::resolve(
			Some(&UpdaterAddress::Phone("+15559999999".to_string())),
			false,
			&local,
			&contacts,
		);
		assert_eq!(unknown_phone.attribution(), UpdateSource::Unknown);
		assert!(unknown_phone.updater_address().is_some());

		let by_local_pni = GroupUpdateSource::resolve(Some(&local.pni.unwrap().into()), false, &local, &contacts);
		assert!(by_local_pni.is_local_user());
		assert_eq!(
			by_local_pni.original_source(),
			&GroupUpdateSource::RejectedInviteToPni(local.pni.unwrap())
		);

		let by_local_phone = GroupUpdateSource::resolve(
			Some(&UpdaterAddress::Phone("+15550000000".to_string())),
			false,
			&local,
			&contacts,
		);
		assert_eq!(
			by_local_phone.original_source(),
			&GroupUpdateSource::Aci(local.aci)
		);
		assert_eq!(by_local_phone.attribution(), UpdateSource::LocalUser);
	}

	#[test]
	fn known_local_overrides_the_hint() {
		let local = local();
		let contacts = InMemoryContacts::new(local.clone());
		let alice = Aci::from_uuid(Uuid::new_v4());

		let source = GroupUpdateSource::resolve(Some(&alice.into()), true, &local, &contacts);
		assert_eq!(source.attribution(), UpdateSource::LocalUser);
		// Ordering still keys off the identity the change named.
		assert_eq!(source.updater_service_id(), Some(ServiceId::Aci(alice)));

		let no_hint = GroupUpdateSource::resolve(None, true, &local, &contacts);
		assert_eq!(no_hint.attribution(), UpdateSource::LocalUser);
		assert_eq!(no_hint.updater_address(), None);
	}
}
