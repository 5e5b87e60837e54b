// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::{
	address::{Aci, ServiceId},
	utils::{serde_base64, serde_base64_list, serde_optional_base64},
};

use super::{
	AccessRequired, GroupAccess, GroupId, GroupIdError, GroupMembership, GroupModel, MemberRole,
	MemberState,
};

#[derive(Debug, thiserror::Error)]
pub enum GroupSerializationError {
	#[error(
		"member role given was {0}. Valid roles are \"UNKNOWN\", \"DEFAULT\", or \"ADMINISTRATOR\""
	)]
	NotARole(String),
	#[error("access level given was {0}. Valid access levels are 0 (unknown) through 4 (unsatisfiable)")]
	NotAnAccessLevel(u8),
	#[error("{0} is listed as a full or requesting member, but only ACIs can be full or requesting members")]
	NotAnAci(ServiceId),
	#[error("{0} appears more than once in the group membership")]
	DuplicateMember(ServiceId),
	#[error("Invalid group ID in group storage: {0}")]
	GroupId(#[from] GroupIdError),
}

fn parse_role(role: &str) -> Result<MemberRole, GroupSerializationError> {
	match role.to_ascii_uppercase().as_str() {
		"UNKNOWN" | "DEFAULT" => Ok(MemberRole::Normal),
		"ADMINISTRATOR" => Ok(MemberRole::Administrator),
		not_role => Err(GroupSerializationError::NotARole(not_role.to_string())),
	}
}

fn role_string(role: MemberRole) -> String {
	match role {
		MemberRole::Normal => "DEFAULT",
		MemberRole::Administrator => "ADMINISTRATOR",
	}
	.to_string()
}

fn parse_access(level: u8) -> Result<AccessRequired, GroupSerializationError> {
	AccessRequired::try_from(level).map_err(|_| GroupSerializationError::NotAnAccessLevel(level))
}

fn require_aci(id: ServiceId) -> Result<Aci, GroupSerializationError> {
	id.aci().ok_or(GroupSerializationError::NotAnAci(id))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GroupMemberStorage {
	pub id: ServiceId,
	pub member_role: String,
	#[serde(default)]
	pub joined_via_invite_link: bool,
	#[serde(default)]
	pub joined_via_join_request: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PendingMemberStorage {
	pub id: ServiceId,
	pub member_role: String,
	#[serde(default)]
	pub added_by: Option<Aci>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMembershipStorage {
	#[serde(default)]
	pub members: Vec<GroupMemberStorage>,
	#[serde(default)]
	pub pending_members: Vec<PendingMemberStorage>,
	#[serde(default)]
	pub requesting_members: Vec<ServiceId>,
	#[serde(default, with = "serde_base64_list")]
	pub invalid_invites: Vec<Vec<u8>>,
}

impl TryFrom<GroupMembershipStorage> for GroupMembership {
	type Error = GroupSerializationError;

	fn try_from(value: GroupMembershipStorage) -> Result<Self, Self::Error> {
		let mut membership = GroupMembership::new();
		let mut insert = |id: ServiceId, state: MemberState| match membership.insert(id, state) {
			Some(_) => Err(GroupSerializationError::DuplicateMember(id)),
			None => Ok(()),
		};

		for member in value.members {
			let aci = require_aci(member.id)?;
			insert(
				ServiceId::Aci(aci),
				MemberState::Full {
					role: parse_role(&member.member_role)?,
					did_join_from_invite_link: member.joined_via_invite_link,
					did_join_from_accepted_join_request: member.joined_via_join_request,
				},
			)?;
		}
		for pending in value.pending_members {
			insert(
				pending.id,
				MemberState::Invited {
					role: parse_role(&pending.member_role)?,
					added_by: pending.added_by,
				},
			)?;
		}
		for requesting in value.requesting_members {
			let aci = require_aci(requesting)?;
			insert(ServiceId::Aci(aci), MemberState::Requesting)?;
		}
		for user_id in value.invalid_invites {
			membership.insert_invalid_invite(user_id);
		}
		Ok(membership)
	}
}

impl From<&GroupMembership> for GroupMembershipStorage {
	fn from(value: &GroupMembership) -> Self {
		let mut storage = GroupMembershipStorage::default();
		for (id, state) in value.members() {
			match state {
				MemberState::Full {
					role,
					did_join_from_invite_link,
					did_join_from_accepted_join_request,
				} => storage.members.push(GroupMemberStorage {
					id: *id,
					member_role: role_string(*role),
					joined_via_invite_link: *did_join_from_invite_link,
					joined_via_join_request: *did_join_from_accepted_join_request,
				}),
				MemberState::Invited { role, added_by } => {
					storage.pending_members.push(PendingMemberStorage {
						id: *id,
						member_role: role_string(*role),
						added_by: *added_by,
					})
				}
				MemberState::Requesting => storage.requesting_members.push(*id),
			}
		}
		storage.invalid_invites = value.invalid_invite_user_ids().iter().cloned().collect();
		storage
	}
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupAccessStorage {
	#[serde(default)]
	pub members: u8,
	#[serde(default)]
	pub attributes: u8,
	#[serde(default)]
	pub add_from_invite_link: u8,
}

impl TryFrom<GroupAccessStorage> for GroupAccess {
	type Error = GroupSerializationError;

	fn try_from(value: GroupAccessStorage) -> Result<Self, Self::Error> {
		Ok(GroupAccess {
			members: parse_access(value.members)?,
			attributes: parse_access(value.attributes)?,
			add_from_invite_link: parse_access(value.add_from_invite_link)?,
		})
	}
}

impl From<GroupAccess> for GroupAccessStorage {
	fn from(value: GroupAccess) -> Self {
		GroupAccessStorage {
			members: value.members.into(),
			attributes: value.attributes.into(),
			add_from_invite_link: value.add_from_invite_link.into(),
		}
	}
}

/// Serializable form of a [`GroupModel`]. Binary fields are base-64.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupModelStorage {
	#[serde(with = "serde_base64")]
	pub group_id: Vec<u8>,
	#[serde(default)]
	pub revision: u32,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub avatar_hash: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub access: GroupAccessStorage,
	#[serde(default)]
	pub is_announcements_only: bool,
	#[serde(default, with = "serde_optional_base64")]
	pub invite_link_password: Option<Vec<u8>>,
	#[serde(default)]
	pub membership: GroupMembershipStorage,
	#[serde(default)]
	pub was_just_migrated: bool,
	#[serde(default)]
	pub is_join_request_placeholder: bool,
	#[serde(default)]
	pub did_just_add_self_via_group_link: bool,
}

impl TryFrom<GroupModelStorage> for GroupModel {
	type Error = GroupSerializationError;

	fn try_from(value: GroupModelStorage) -> Result<Self, Self::Error> {
		Ok(GroupModel {
			group_id: GroupId::from_bytes(&value.group_id)?,
			revision: value.revision,
			name: value.name,
			avatar_hash: value.avatar_hash,
			description: value.description,
			access: GroupAccess::try_from(value.access)?,
			is_announcements_only: value.is_announcements_only,
			invite_link_password: value.invite_link_password,
			membership: GroupMembership::try_from(value.membership)?,
			was_just_migrated: value.was_just_migrated,
			is_join_request_placeholder: value.is_join_request_placeholder,
			did_just_add_self_via_group_link: value.did_just_add_self_via_group_link,
		})
	}
}

impl From<&GroupModel> for GroupModelStorage {
	fn from(value: &GroupModel) -> Self {
		GroupModelStorage {
			group_id: value.group_id.as_bytes().to_vec(),
			revision: value.revision,
			name: value.name.clone(),
			avatar_hash: value.avatar_hash.clone(),
			description: value.description.clone(),
			access: value.access.into(),
			is_announcements_only: value.is_announcements_only,
			invite_link_password: value.invite_link_password.clone(),
			membership: GroupMembershipStorage::from(&value.membership),
			was_just_migrated: value.was_just_migrated,
			is_join_request_placeholder: value.is_join_request_placeholder,
			did_just_add_self_via_group_link: value.did_just_add_self_via_group_link,
		}
	}
}
