// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use std::{convert::TryFrom, fmt, str::FromStr};

use custom_error::custom_error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Phone number (as formatted to the E.164 standard).
/// String should begin with '+', followed by a country code and the subscriber number (no delimiters between parts, as in no "-" or " ").
/// Legacy (v1) group updates may name their author by phone number only.
pub type E164 = String;

/// Prefix marking the string form of a phone number identity.
pub const PNI_PREFIX: &str = "PNI:";

custom_error! {pub AddressError
	NotAUuid{val: String} = "Could not parse {val} as a service ID: expected a UUID, optionally prefixed with \"PNI:\".",
	NotAPhoneNumber{val: String} = "Could not parse {val} as an E164 phone number: must begin with '+' followed by digits.",
	UnexpectedPni{val: String} = "Expected an ACI but got the phone number identity {val}.",
	UnexpectedAci{val: String} = "Expected a PNI but got the account identity {val}.",
}

/// Returns true if the given string looks like an E164 phone number.
pub fn is_e164(val: &str) -> bool {
	match val.strip_prefix('+') {
		Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
		None => false,
	}
}

/// Account identity. Stable across phone number changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Aci(Uuid);

/// Phone number identity. Changes when the account's phone number changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pni(Uuid);

impl Aci {
	pub fn from_uuid(uuid: Uuid) -> Self {
		Aci(uuid)
	}
	pub fn uuid(&self) -> Uuid {
		self.0
	}
}

impl Pni {
	pub fn from_uuid(uuid: Uuid) -> Self {
		Pni(uuid)
	}
	pub fn uuid(&self) -> Uuid {
		self.0
	}
}

impl From<Uuid> for Aci {
	fn from(val: Uuid) -> Self {
		Aci(val)
	}
}

impl From<Uuid> for Pni {
	fn from(val: Uuid) -> Self {
		Pni(val)
	}
}

impl fmt::Display for Aci {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0.hyphenated())
	}
}

impl fmt::Display for Pni {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}{}", PNI_PREFIX, self.0.hyphenated())
	}
}

/// Any identity a group member can be listed under.
///
/// The derived ordering puts every ACI before every PNI, then orders by UUID bytes.
/// Membership diffs rely on this for a stable traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceId {
	Aci(Aci),
	Pni(Pni),
}

impl ServiceId {
	pub fn aci(&self) -> Option<Aci> {
		match self {
			ServiceId::Aci(aci) => Some(*aci),
			ServiceId::Pni(_) => None,
		}
	}
	pub fn pni(&self) -> Option<Pni> {
		match self {
			ServiceId::Aci(_) => None,
			ServiceId::Pni(pni) => Some(*pni),
		}
	}
	pub fn uuid(&self) -> Uuid {
		match self {
			ServiceId::Aci(aci) => aci.uuid(),
			ServiceId::Pni(pni) => pni.uuid(),
		}
	}
}

impl From<Aci> for ServiceId {
	fn from(val: Aci) -> Self {
		ServiceId::Aci(val)
	}
}

impl From<Pni> for ServiceId {
	fn from(val: Pni) -> Self {
		ServiceId::Pni(val)
	}
}

impl fmt::Display for ServiceId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ServiceId::Aci(aci) => aci.fmt(f),
			ServiceId::Pni(pni) => pni.fmt(f),
		}
	}
}

impl FromStr for ServiceId {
	type Err = AddressError;

	fn from_str(val: &str) -> Result<Self, Self::Err> {
		let trimmed = val.trim();
		let (is_pni, uuid_str) = match trimmed.get(..PNI_PREFIX.len()) {
			Some(prefix) if prefix.eq_ignore_ascii_case(PNI_PREFIX) => {
				(true, &trimmed[PNI_PREFIX.len()..])
			}
			_ => (false, trimmed),
		};
		let uuid = Uuid::from_str(uuid_str).map_err(|_| AddressError::NotAUuid {
			val: val.to_string(),
		})?;
		Ok(if is_pni {
			ServiceId::Pni(Pni(uuid))
		} else {
			ServiceId::Aci(Aci(uuid))
		})
	}
}

impl FromStr for Aci {
	type Err = AddressError;

	fn from_str(val: &str) -> Result<Self, Self::Err> {
		match ServiceId::from_str(val)? {
			ServiceId::Aci(aci) => Ok(aci),
			ServiceId::Pni(_) => Err(AddressError::UnexpectedPni {
				val: val.to_string(),
			}),
		}
	}
}

impl FromStr for Pni {
	type Err = AddressError;

	fn from_str(val: &str) -> Result<Self, Self::Err> {
		match ServiceId::from_str(val)? {
			ServiceId::Pni(pni) => Ok(pni),
			ServiceId::Aci(_) => Err(AddressError::UnexpectedAci {
				val: val.to_string(),
			}),
		}
	}
}

// Identities are persisted in their string form.
macro_rules! string_serde {
	($name:ty) => {
		impl Serialize for $name {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let string = String::deserialize(deserializer)?;
				string
					.parse()
					.map_err(|err: AddressError| serde::de::Error::custom(err.to_string()))
			}
		}
	};
}

string_serde!(Aci);
string_serde!(Pni);
string_serde!(ServiceId);

/// Whatever we were told about who made a group change.
/// Legacy updates only carry a phone number; newer ones carry a service ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdaterAddress {
	Phone(E164),
	ServiceId(ServiceId),
}

impl UpdaterAddress {
	pub fn service_id(&self) -> Option<ServiceId> {
		match self {
			UpdaterAddress::Phone(_) => None,
			UpdaterAddress::ServiceId(id) => Some(*id),
		}
	}
	pub fn phone_number(&self) -> Option<&E164> {
		match self {
			UpdaterAddress::Phone(p) => Some(p),
			UpdaterAddress::ServiceId(_) => None,
		}
	}
}

impl fmt::Display for UpdaterAddress {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			UpdaterAddress::Phone(p) => write!(f, "{}", p),
			UpdaterAddress::ServiceId(id) => write!(f, "{}", id),
		}
	}
}

impl From<ServiceId> for UpdaterAddress {
	fn from(val: ServiceId) -> Self {
		UpdaterAddress::ServiceId(val)
	}
}

impl From<Aci> for UpdaterAddress {
	fn from(val: Aci) -> Self {
		UpdaterAddress::ServiceId(ServiceId::Aci(val))
	}
}

impl From<Pni> for UpdaterAddress {
	fn from(val: Pni) -> Self {
		UpdaterAddress::ServiceId(ServiceId::Pni(val))
	}
}

impl TryFrom<&str> for UpdaterAddress {
	type Error = AddressError;
	fn try_from(val: &str) -> Result<Self, AddressError> {
		let val = val.trim();
		if val.starts_with('+') {
			if is_e164(val) {
				Ok(UpdaterAddress::Phone(val.to_string()))
			} else {
				Err(AddressError::NotAPhoneNumber {
					val: val.to_string(),
				})
			}
		} else {
			Ok(UpdaterAddress::ServiceId(ServiceId::from_str(val)?))
		}
	}
}

impl FromStr for UpdaterAddress {
	type Err = AddressError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		UpdaterAddress::try_from(s)
	}
}
