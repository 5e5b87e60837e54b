// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

pub mod builder;
pub mod diff;
pub mod group_storage;
pub mod membership;
pub mod new_group;
pub mod translate;
pub mod update_item;
pub mod update_record;
pub mod update_source;

#[cfg(test)]
mod tests;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::utils::{avatar_hash, stripped_non_empty};

pub use membership::{GroupMembership, MemberRole, MemberState, MembershipStatus};

#[derive(Debug, thiserror::Error)]
pub enum GroupIdError {
    #[error("Error parsing group ID - valid sizes are 16 bytes for v1, or 32 bytes for v2. Instead, we got a group ID which is {0} bytes long. The group ID (in base-64) was: {1}")]
    InvalidSize(usize, String),
    #[error("Attempted to construct a GroupsV1 group ID but a GroupsV1 group ID is 16 bytes and the provided buffer was {0} bytes in size")]
    WrongSizeV1(usize),
    #[error("Attempted to construct a GroupsV2 group ID but a GroupsV2 group ID is 32 bytes and the provided buffer was {0} bytes in size")]
    WrongSizeV2(usize),
    #[error("Error parsing base64 into Group ID: {0:?}")]
    ParsingError(#[from] base64::DecodeError),
}

pub type GroupIdV1 = [u8; 16];
pub type GroupIdV2 = [u8; 32];

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd)]
pub enum GroupId {
    V1(GroupIdV1),
    V2(GroupIdV2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupVersion {
    V1,
    V2,
}

impl GroupId {
    pub fn from_bytes_v1(val: &[u8]) -> Result<Self, GroupIdError> {
        if val.len() != 16 {
            Err(GroupIdError::WrongSizeV1(val.len()))
        } else {
            let mut buf: [u8; 16] = [0; 16];
            buf.copy_from_slice(&val[0..16]);
            Ok(GroupId::V1(buf))
        }
    }
    pub fn from_bytes_v2(val: &[u8]) -> Result<Self, GroupIdError> {
        if val.len() != 32 {
            Err(GroupIdError::WrongSizeV2(val.len()))
        } else {
            let mut buf: [u8; 32] = [0; 32];
            buf.copy_from_slice(&val[0..32]);
            Ok(GroupId::V2(buf))
        }
    }
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, GroupIdError> {
        match buffer.len() {
            16 => Self::from_bytes_v1(buffer),
            32 => Self::from_bytes_v2(buffer),
            len => Err(GroupIdError::InvalidSize(len, base64::encode(buffer))),
        }
    }
    pub fn from_base64(b64: &str) -> Result<Self, GroupIdError> {
        let buf = base64::decode(b64)?;
        Self::from_bytes(&buf)
    }
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            GroupId::V1(id) => id,
            GroupId::V2(id) => id,
        }
    }
    pub fn to_base64(&self) -> String {
        base64::encode(self.as_bytes())
    }
    pub fn version(&self) -> GroupVersion {
        match self {
            GroupId::V1(_) => GroupVersion::V1,
            GroupId::V2(_) => GroupVersion::V2,
        }
    }
}

/// Who is allowed to do something in a group. Stored by its integer value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccessRequired {
    Unknown = 0,
    Any = 1,
    Member = 2,
    Administrator = 3,
    Unsatisfiable = 4,
}

impl Default for AccessRequired {
    fn default() -> Self {
        AccessRequired::Unknown
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupAccess {
    /// Who may add members.
    pub members: AccessRequired,
    /// Who may edit the title, avatar, description and timer.
    pub attributes: AccessRequired,
    /// Who may join through the invite link without approval.
    pub add_from_invite_link: AccessRequired,
}

impl GroupAccess {
    pub fn new(members: AccessRequired, attributes: AccessRequired, add_from_invite_link: AccessRequired) -> Self {
        GroupAccess {
            members,
            attributes,
            add_from_invite_link,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InviteLinkMode {
    Disabled,
    EnabledWithoutApproval,
    EnabledWithApproval,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisappearingMessageToken {
    pub is_enabled: bool,
    pub duration_seconds: u32,
}

impl DisappearingMessageToken {
    pub fn new(is_enabled: bool, duration_seconds: u32) -> Self {
        DisappearingMessageToken {
            is_enabled,
            duration_seconds,
        }
    }

    /// Enabled exactly when the duration is nonzero.
    pub fn from_duration(duration_seconds: u32) -> Self {
        Self::new(duration_seconds > 0, duration_seconds)
    }

    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_seconds) * 1000
    }
}

/// A group, as of one revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupModel {
    pub group_id: GroupId,
    pub revision: u32,
    pub name: Option<String>,
    pub avatar_hash: Option<String>,
    /// Only v2 groups have descriptions.
    pub description: Option<String>,
    pub access: GroupAccess,
    pub is_announcements_only: bool,
    pub invite_link_password: Option<Vec<u8>>,
    pub membership: GroupMembership,
    /// This revision is the one where a v1 group became a v2 group.
    pub was_just_migrated: bool,
    /// Stand-in model we keep while our request to join is pending.
    pub is_join_request_placeholder: bool,
    pub did_just_add_self_via_group_link: bool,
}

impl GroupModel {
    pub fn new(group_id: GroupId, revision: u32, membership: GroupMembership) -> Self {
        GroupModel {
            group_id,
            revision,
            name: None,
            avatar_hash: None,
            description: None,
            access: GroupAccess::default(),
            is_announcements_only: false,
            invite_link_password: None,
            membership,
            was_just_migrated: false,
            is_join_request_placeholder: false,
            did_just_add_self_via_group_link: false,
        }
    }

    pub fn version(&self) -> GroupVersion {
        self.group_id.version()
    }

    pub fn is_v2(&self) -> bool {
        self.version() == GroupVersion::V2
    }

    pub fn is_first_revision(&self) -> bool {
        self.revision == 0
    }

    /// Group name with whitespace trimmed. `None` when unset or blank.
    pub fn stripped_name(&self) -> Option<&str> {
        stripped_non_empty(self.name.as_deref())
    }

    pub fn stripped_description(&self) -> Option<&str> {
        stripped_non_empty(self.description.as_deref())
    }

    pub fn has_avatar(&self) -> bool {
        self.avatar_hash.as_deref().map_or(false, |h| !h.is_empty())
    }

    pub fn set_avatar(&mut self, avatar_data: Option<&[u8]>) {
        self.avatar_hash = avatar_data.map(avatar_hash);
    }

    pub fn invite_link_mode(&self) -> InviteLinkMode {
        match self.invite_link_password.as_deref() {
            None | Some([]) => InviteLinkMode::Disabled,
            Some(_) => match self.access.add_from_invite_link {
                AccessRequired::Any => InviteLinkMode::EnabledWithoutApproval,
                AccessRequired::Administrator => InviteLinkMode::EnabledWithApproval,
                _ => InviteLinkMode::Disabled,
            },
        }
    }
}
