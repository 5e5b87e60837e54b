// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

//! Persistable group update records.
//!
//! A record names users by identity only. Names are looked up when a record is turned into a
//! [`GroupUpdateItem`](super::update_item::GroupUpdateItem), so renamed contacts show up under
//! their current name.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    address::{Aci, Pni, ServiceId},
    LocalIdentifiers,
};

use super::{update_source::GroupUpdateSource, AccessRequired, GroupModel};

#[derive(Debug, thiserror::Error)]
pub enum UpdateRecordCodingError {
    #[error("Failed to encode group update records: {0}")]
    Encode(serde_json::Error),
    #[error("Failed to decode group update records: {0}")]
    Decode(serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupUpdateRecord {
    /// A run of join requests and cancellations from one user, collapsed into one record.
    SequenceOfInviteLinkRequestAndCancels {
        requester: Aci,
        count: u32,
        is_tail: bool,
    },
    /// An invite sent to a PNI was accepted by the matching ACI.
    InvitedPniPromotedToFullMemberAci {
        new_member: Aci,
        inviter: Option<Aci>,
    },

    GenericUpdateByLocalUser,
    GenericUpdateByOtherUser { updater_aci: Aci },
    GenericUpdateByUnknownUser,

    CreatedByLocalUser,
    CreatedByOtherUser { updater_aci: Aci },
    CreatedByUnknownUser,
    InviteFriendsToNewlyCreatedGroup,

    WasMigrated,
    LocalUserInvitedAfterMigration,
    OtherUsersInvitedAfterMigration { count: u32 },
    OtherUsersDroppedAfterMigration { count: u32 },

    NameChangedByLocalUser { new_group_name: String },
    NameChangedByOtherUser { updater_aci: Aci, new_group_name: String },
    NameChangedByUnknownUser { new_group_name: String },
    NameRemovedByLocalUser,
    NameRemovedByOtherUser { updater_aci: Aci },
    NameRemovedByUnknownUser,

    AvatarChangedByLocalUser,
    AvatarChangedByOtherUser { updater_aci: Aci },
    AvatarChangedByUnknownUser,
    AvatarRemovedByLocalUser,
    AvatarRemovedByOtherUser { updater_aci: Aci },
    AvatarRemovedByUnknownUser,

    DescriptionChangedByLocalUser { new_description: String },
    DescriptionChangedByOtherUser { updater_aci: Aci, new_description: String },
    DescriptionChangedByUnknownUser { new_description: String },
    DescriptionRemovedByLocalUser,
    DescriptionRemovedByOtherUser { updater_aci: Aci },
    DescriptionRemovedByUnknownUser,

    MembersAccessChangedByLocalUser { new_access: AccessRequired },
    MembersAccessChangedByOtherUser { updater_aci: Aci, new_access: AccessRequired },
    MembersAccessChangedByUnknownUser { new_access: AccessRequired },
    AttributesAccessChangedByLocalUser { new_access: AccessRequired },
    AttributesAccessChangedByOtherUser { updater_aci: Aci, new_access: AccessRequired },
    AttributesAccessChangedByUnknownUser { new_access: AccessRequired },

    AnnouncementOnlyEnabledByLocalUser,
    AnnouncementOnlyEnabledByOtherUser { updater_aci: Aci },
    AnnouncementOnlyEnabledByUnknownUser,
    AnnouncementOnlyDisabledByLocalUser,
    AnnouncementOnlyDisabledByOtherUser { updater_aci: Aci },
    AnnouncementOnlyDisabledByUnknownUser,

    LocalUserWasGrantedAdministratorByLocalUser,
    LocalUserWasGrantedAdministratorByOtherUser { updater_aci: Aci },
    LocalUserWasGrantedAdministratorByUnknownUser,
    OtherUserWasGrantedAdministratorByLocalUser { user_aci: Aci },
    OtherUserWasGrantedAdministratorByOtherUser { updater_aci: Aci, user_aci: Aci },
    OtherUserWasGrantedAdministratorByUnknownUser { user_aci: Aci },
    LocalUserWasRevokedAdministratorByLocalUser,
    LocalUserWasRevokedAdministratorByOtherUser { updater_aci: Aci },
    LocalUserWasRevokedAdministratorByUnknownUser,
    OtherUserWasRevokedAdministratorByLocalUser { user_aci: Aci },
    OtherUserWasRevokedAdministratorByOtherUser { updater_aci: Aci, user_aci: Aci },
    OtherUserWasRevokedAdministratorByUnknownUser { user_aci: Aci },

    LocalUserLeft,
    LocalUserRemoved { remover_aci: Aci },
    LocalUserRemovedByUnknownUser,
    OtherUserLeft { user_aci: Aci },
    OtherUserRemovedByLocalUser { user_aci: Aci },
    OtherUserRemoved { remover_aci: Aci, user_aci: Aci },
    OtherUserRemovedByUnknownUser { user_aci: Aci },

    LocalUserWasInvitedByLocalUser,
    LocalUserWasInvitedByOtherUser { updater_aci: Aci },
    LocalUserWasInvitedByUnknownUser,
    OtherUserWasInvitedByLocalUser { invitee: ServiceId },
    UnnamedUsersWereInvitedByLocalUser { count: u32 },
    UnnamedUsersWereInvitedByOtherUser { updater_aci: Aci, count: u32 },
    UnnamedUsersWereInvitedByUnknownUser { count: u32 },

    LocalUserAcceptedInviteFromInviter { inviter_aci: Aci },
    LocalUserAcceptedInviteFromUnknownUser,
    OtherUserAcceptedInviteFromLocalUser { user_aci: Aci },
    OtherUserAcceptedInviteFromInviter { user_aci: Aci, inviter_aci: Aci },
    OtherUserAcceptedInviteFromUnknownUser { user_aci: Aci },

    LocalUserJoined,
    OtherUserJoined { user_aci: Aci },

    LocalUserAddedByLocalUser,
    LocalUserAddedByOtherUser { updater_aci: Aci },
    LocalUserAddedByUnknownUser,
    OtherUserAddedByLocalUser { user_aci: Aci },
    OtherUserAddedByOtherUser { updater_aci: Aci, user_aci: Aci },
    OtherUserAddedByUnknownUser { user_aci: Aci },

    LocalUserDeclinedInviteFromInviter { inviter_aci: Aci },
    LocalUserDeclinedInviteFromUnknownUser,
    OtherUserDeclinedInviteFromLocalUser { invitee: ServiceId },
    OtherUserDeclinedInviteFromInviter { invitee: ServiceId, inviter_aci: Aci },
    OtherUserDeclinedInviteFromUnknownUser { invitee: ServiceId },
    UnnamedUserDeclinedInviteFromInviter { inviter_aci: Aci },
    UnnamedUserDeclinedInviteFromUnknownUser,

    LocalUserInviteRevoked { revoker_aci: Aci },
    LocalUserInviteRevokedByUnknownUser,
    OtherUserInviteRevokedByLocalUser { invitee: ServiceId },
    UnnamedUserInvitesWereRevokedByLocalUser { count: u32 },
    UnnamedUserInvitesWereRevokedByOtherUser { updater_aci: Aci, count: u32 },
    UnnamedUserInvitesWereRevokedByUnknownUser { count: u32 },

    LocalUserRequestedToJoin,
    OtherUserRequestedToJoin { user_aci: Aci },
    LocalUserRequestApproved { approver_aci: Aci },
    LocalUserRequestApprovedByUnknownUser,
    OtherUserRequestApprovedByLocalUser { user_aci: Aci },
    OtherUserRequestApproved { user_aci: Aci, approver_aci: Aci },
    OtherUserRequestApprovedByUnknownUser { user_aci: Aci },
    LocalUserRequestCanceledByLocalUser,
    LocalUserRequestRejectedByUnknownUser,
    OtherUserRequestRejectedByLocalUser { requester_aci: Aci },
    OtherUserRequestRejectedByOtherUser { updater_aci: Aci, requester_aci: Aci },
    OtherUserRequestCanceledByOtherUser { requester_aci: Aci },
    OtherUserRequestRejectedByUnknownUser { requester_aci: Aci },

    DisappearingMessagesEnabledByLocalUser { duration_ms: u64 },
    DisappearingMessagesEnabledByOtherUser { updater_aci: Aci, duration_ms: u64 },
    DisappearingMessagesEnabledByUnknownUser { duration_ms: u64 },
    DisappearingMessagesDisabledByLocalUser,
    DisappearingMessagesDisabledByOtherUser { updater_aci: Aci },
    DisappearingMessagesDisabledByUnknownUser,
    /// The timer is on, but there is no earlier setting to compare it against.
    DisappearingMessagesObservedWithoutBaselineByLocalUser { duration_ms: u64 },
    DisappearingMessagesObservedWithoutBaselineByUnknownUser { duration_ms: u64 },

    InviteLinkResetByLocalUser,
    InviteLinkResetByOtherUser { updater_aci: Aci },
    InviteLinkResetByUnknownUser,
    InviteLinkEnabledWithoutApprovalByLocalUser,
    InviteLinkEnabledWithoutApprovalByOtherUser { updater_aci: Aci },
    InviteLinkEnabledWithoutApprovalByUnknownUser,
    InviteLinkEnabledWithApprovalByLocalUser,
    InviteLinkEnabledWithApprovalByOtherUser { updater_aci: Aci },
    InviteLinkEnabledWithApprovalByUnknownUser,
    InviteLinkDisabledByLocalUser,
    InviteLinkDisabledByOtherUser { updater_aci: Aci },
    InviteLinkDisabledByUnknownUser,
    InviteLinkApprovalDisabledByLocalUser,
    InviteLinkApprovalDisabledByOtherUser { updater_aci: Aci },
    InviteLinkApprovalDisabledByUnknownUser,
    InviteLinkApprovalEnabledByLocalUser,
    InviteLinkApprovalEnabledByOtherUser { updater_aci: Aci },
    InviteLinkApprovalEnabledByUnknownUser,

    LocalUserJoinedViaInviteLink,
    OtherUserJoinedViaInviteLink { user_aci: Aci },
}

impl GroupUpdateRecord {
    /// True for the records that mean the local user just became a member.
    pub fn is_local_user_join(&self) -> bool {
        matches!(
            self,
            GroupUpdateRecord::LocalUserJoined
                | GroupUpdateRecord::LocalUserJoinedViaInviteLink
                | GroupUpdateRecord::LocalUserRequestApproved { .. }
                | GroupUpdateRecord::LocalUserRequestApprovedByUnknownUser
        )
    }
}

/// A list of records, as persisted alongside a group update message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupUpdateRecords(pub Vec<GroupUpdateRecord>);

impl GroupUpdateRecords {
    pub fn to_json(&self) -> Result<String, UpdateRecordCodingError> {
        serde_json::to_string(self).map_err(UpdateRecordCodingError::Encode)
    }

    pub fn from_json(json: &str) -> Result<Self, UpdateRecordCodingError> {
        serde_json::from_str(json).map_err(UpdateRecordCodingError::Decode)
    }

    pub fn into_inner(self) -> Vec<GroupUpdateRecord> {
        self.0
    }
}

impl From<Vec<GroupUpdateRecord>> for GroupUpdateRecords {
    fn from(val: Vec<GroupUpdateRecord>) -> Self {
        GroupUpdateRecords(val)
    }
}

/// Records in the older persisted format, which left out anything recoverable from the
/// update's author and the previous group model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegacyGroupUpdateRecord {
    SequenceOfInviteLinkRequestAndCancels { count: u32, is_tail: bool },
    InvitedPniPromotedToFullMemberAci { pni: Pni, aci: Aci },
    InviteRemoved { invitee: ServiceId, was_local_user: bool },
}

impl LegacyGroupUpdateRecord {
    /// Upgrade to a current record. Returns `None` when the author is missing or could not have made this change.
    pub fn to_new_record(
        &self,
        updater: &GroupUpdateSource,
        old_group_model: Option<&GroupModel>,
        local_identifiers: &LocalIdentifiers,
    ) -> Option<GroupUpdateRecord> {
        match self {
            LegacyGroupUpdateRecord::SequenceOfInviteLinkRequestAndCancels { count, is_tail } => {
                match updater {
                    GroupUpdateSource::Aci(aci) => {
                        Some(GroupUpdateRecord::SequenceOfInviteLinkRequestAndCancels {
                            requester: *aci,
                            count: *count,
                            is_tail: *is_tail,
                        })
                    }
                    _ => {
                        warn!("Collapsed join requests without a requester ACI; dropping the record.");
                        None
                    }
                }
            }
            LegacyGroupUpdateRecord::InvitedPniPromotedToFullMemberAci { pni, aci } => {
                Some(GroupUpdateRecord::InvitedPniPromotedToFullMemberAci {
                    new_member: *aci,
                    inviter: old_group_model
                        .and_then(|model| model.membership.added_by_aci(&ServiceId::Pni(*pni))),
                })
            }
            LegacyGroupUpdateRecord::InviteRemoved {
                invitee,
                was_local_user,
            } => {
                let (remover, was_rejected_invite) = match updater {
                    GroupUpdateSource::Aci(aci) => (ServiceId::Aci(*aci), false),
                    GroupUpdateSource::RejectedInviteToPni(pni) => (ServiceId::Pni(*pni), true),
                    GroupUpdateSource::LocalUser { original_source } => {
                        match original_source.as_ref() {
                            GroupUpdateSource::Aci(aci) => (ServiceId::Aci(*aci), false),
                            GroupUpdateSource::RejectedInviteToPni(pni) => {
                                (ServiceId::Pni(*pni), true)
                            }
                            _ => {
                                warn!("Removed invite attributed to the local user without an identity.");
                                return None;
                            }
                        }
                    }
                    GroupUpdateSource::Unknown | GroupUpdateSource::LegacyE164(_) => {
                        warn!("Only ACIs or PNIs can remove an invite.");
                        return None;
                    }
                };

                let inviter_aci =
                    old_group_model.and_then(|model| model.membership.added_by_aci(invitee));

                let record = if *was_local_user {
                    if was_rejected_invite || local_identifiers.contains(&remover) {
                        match inviter_aci {
                            Some(inviter_aci) => {
                                GroupUpdateRecord::LocalUserDeclinedInviteFromInviter { inviter_aci }
                            }
                            None => GroupUpdateRecord::LocalUserDeclinedInviteFromUnknownUser,
                        }
                    } else {
                        match remover.aci() {
                            Some(revoker_aci) => GroupUpdateRecord::LocalUserInviteRevoked { revoker_aci },
                            None => GroupUpdateRecord::LocalUserInviteRevokedByUnknownUser,
                        }
                    }
                } else if was_rejected_invite || *invitee == remover {
                    match inviter_aci {
                        Some(inviter_aci) if inviter_aci == local_identifiers.aci => {
                            GroupUpdateRecord::OtherUserDeclinedInviteFromLocalUser { invitee: *invitee }
                        }
                        Some(inviter_aci) => GroupUpdateRecord::OtherUserDeclinedInviteFromInviter {
                            invitee: *invitee,
                            inviter_aci,
                        },
                        None => GroupUpdateRecord::OtherUserDeclinedInviteFromUnknownUser {
                            invitee: *invitee,
                        },
                    }
                } else {
                    match remover.aci() {
                        Some(remover_aci) if remover_aci == local_identifiers.aci => {
                            GroupUpdateRecord::OtherUserInviteRevokedByLocalUser { invitee: *invitee }
                        }
                        Some(remover_aci) => {
                            GroupUpdateRecord::UnnamedUserInvitesWereRevokedByOtherUser {
                                updater_aci: remover_aci,
                                count: 1,
                            }
                        }
                        None => GroupUpdateRecord::UnnamedUserInvitesWereRevokedByUnknownUser { count: 1 },
                    }
                };
                Some(record)
            }
        }
    }
}
