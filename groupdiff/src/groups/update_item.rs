// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use serde::{Deserialize, Serialize};

use crate::address::ServiceId;

use super::AccessRequired;

/// A user referenced by an update item, with the display name they had when the item was built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedUser {
    pub name: String,
    pub address: ServiceId,
}

/// One renderable description of a single group change.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupUpdateItem {
    SequenceOfInviteLinkRequestAndCancels {
        user: NamedUser,
        count: u32,
        is_tail: bool,
    },

    GenericUpdateByLocalUser,
    GenericUpdateByOtherUser { updater: NamedUser },
    GenericUpdateByUnknownUser,

    CreatedByLocalUser,
    CreatedByOtherUser { updater: NamedUser },
    CreatedByUnknownUser,
    InviteFriendsToNewlyCreatedGroup,

    WasMigrated,
    LocalUserInvitedAfterMigration,
    OtherUsersInvitedAfterMigration { count: u32 },
    OtherUsersDroppedAfterMigration { count: u32 },

    NameChangedByLocalUser { new_group_name: String },
    NameChangedByOtherUser { updater: NamedUser, new_group_name: String },
    NameChangedByUnknownUser { new_group_name: String },
    NameRemovedByLocalUser,
    NameRemovedByOtherUser { updater: NamedUser },
    NameRemovedByUnknownUser,

    AvatarChangedByLocalUser,
    AvatarChangedByOtherUser { updater: NamedUser },
    AvatarChangedByUnknownUser,
    AvatarRemovedByLocalUser,
    AvatarRemovedByOtherUser { updater: NamedUser },
    AvatarRemovedByUnknownUser,

    DescriptionChangedByLocalUser { new_description: String },
    DescriptionChangedByOtherUser { updater: NamedUser, new_description: String },
    DescriptionChangedByUnknownUser { new_description: String },
    DescriptionRemovedByLocalUser,
    DescriptionRemovedByOtherUser { updater: NamedUser },
    DescriptionRemovedByUnknownUser,

    MembersAccessChangedByLocalUser { new_access: AccessRequired },
    MembersAccessChangedByOtherUser { updater: NamedUser, new_access: AccessRequired },
    MembersAccessChangedByUnknownUser { new_access: AccessRequired },
    AttributesAccessChangedByLocalUser { new_access: AccessRequired },
    AttributesAccessChangedByOtherUser { updater: NamedUser, new_access: AccessRequired },
    AttributesAccessChangedByUnknownUser { new_access: AccessRequired },

    AnnouncementOnlyEnabledByLocalUser,
    AnnouncementOnlyEnabledByOtherUser { updater: NamedUser },
    AnnouncementOnlyEnabledByUnknownUser,
    AnnouncementOnlyDisabledByLocalUser,
    AnnouncementOnlyDisabledByOtherUser { updater: NamedUser },
    AnnouncementOnlyDisabledByUnknownUser,

    LocalUserWasGrantedAdministratorByLocalUser,
    LocalUserWasGrantedAdministratorByOtherUser { updater: NamedUser },
    LocalUserWasGrantedAdministratorByUnknownUser,
    OtherUserWasGrantedAdministratorByLocalUser { user: NamedUser },
    OtherUserWasGrantedAdministratorByOtherUser { updater: NamedUser, user: NamedUser },
    OtherUserWasGrantedAdministratorByUnknownUser { user: NamedUser },
    LocalUserWasRevokedAdministratorByLocalUser,
    LocalUserWasRevokedAdministratorByOtherUser { updater: NamedUser },
    LocalUserWasRevokedAdministratorByUnknownUser,
    OtherUserWasRevokedAdministratorByLocalUser { user: NamedUser },
    OtherUserWasRevokedAdministratorByOtherUser { updater: NamedUser, user: NamedUser },
    OtherUserWasRevokedAdministratorByUnknownUser { user: NamedUser },

    LocalUserLeft,
    LocalUserRemoved { remover: NamedUser },
    LocalUserRemovedByUnknownUser,
    OtherUserLeft { user: NamedUser },
    OtherUserRemovedByLocalUser { user: NamedUser },
    OtherUserRemoved { remover: NamedUser, user: NamedUser },
    OtherUserRemovedByUnknownUser { user: NamedUser },

    LocalUserWasInvitedByLocalUser,
    LocalUserWasInvitedByOtherUser { updater: NamedUser },
    LocalUserWasInvitedByUnknownUser,
    OtherUserWasInvitedByLocalUser { user: NamedUser },
    UnnamedUsersWereInvitedByLocalUser { count: u32 },
    UnnamedUsersWereInvitedByOtherUser { updater: NamedUser, count: u32 },
    UnnamedUsersWereInvitedByUnknownUser { count: u32 },

    LocalUserAcceptedInviteFromInviter { inviter: NamedUser },
    LocalUserAcceptedInviteFromUnknownUser,
    OtherUserAcceptedInviteFromLocalUser { user: NamedUser },
    OtherUserAcceptedInviteFromInviter { user: NamedUser, inviter: NamedUser },
    OtherUserAcceptedInviteFromUnknownUser { user: NamedUser },

    LocalUserJoined,
    OtherUserJoined { user: NamedUser },

    LocalUserAddedByLocalUser,
    LocalUserAddedByOtherUser { updater: NamedUser },
    LocalUserAddedByUnknownUser,
    OtherUserAddedByLocalUser { user: NamedUser },
    OtherUserAddedByOtherUser { updater: NamedUser, user: NamedUser },
    OtherUserAddedByUnknownUser { user: NamedUser },

    LocalUserDeclinedInviteFromInviter { inviter: NamedUser },
    LocalUserDeclinedInviteFromUnknownUser,
    OtherUserDeclinedInviteFromLocalUser { user: NamedUser },
    /// The invitee isn't named: we only show who sent the declined invite.
    OtherUserDeclinedInviteFromInviter { inviter: NamedUser },
    OtherUserDeclinedInviteFromUnknownUser,

    LocalUserInviteRevoked { revoker: NamedUser },
    LocalUserInviteRevokedByUnknownUser,
    OtherUserInviteRevokedByLocalUser { user: NamedUser },
    UnnamedUserInvitesWereRevokedByLocalUser { count: u32 },
    UnnamedUserInvitesWereRevokedByOtherUser { updater: NamedUser, count: u32 },
    UnnamedUserInvitesWereRevokedByUnknownUser { count: u32 },

    LocalUserRequestedToJoin,
    OtherUserRequestedToJoin { user: NamedUser },
    LocalUserRequestApproved { approver: NamedUser },
    LocalUserRequestApprovedByUnknownUser,
    OtherUserRequestApprovedByLocalUser { user: NamedUser },
    OtherUserRequestApproved { user: NamedUser, approver: NamedUser },
    OtherUserRequestApprovedByUnknownUser { user: NamedUser },
    LocalUserRequestCanceledByLocalUser,
    LocalUserRequestRejectedByUnknownUser,
    OtherUserRequestRejectedByLocalUser { requester: NamedUser },
    OtherUserRequestRejectedByOtherUser { updater: NamedUser, requester: NamedUser },
    OtherUserRequestCanceledByOtherUser { requester: NamedUser },
    OtherUserRequestRejectedByUnknownUser { requester: NamedUser },

    DisappearingMessagesEnabledByLocalUser { duration_ms: u64 },
    DisappearingMessagesEnabledByOtherUser { updater: NamedUser, duration_ms: u64 },
    DisappearingMessagesEnabledByUnknownUser { duration_ms: u64 },
    DisappearingMessagesDisabledByLocalUser,
    DisappearingMessagesDisabledByOtherUser { updater: NamedUser },
    DisappearingMessagesDisabledByUnknownUser,
    DisappearingMessagesObservedWithoutBaselineByLocalUser { duration_ms: u64 },
    DisappearingMessagesObservedWithoutBaselineByUnknownUser { duration_ms: u64 },

    InviteLinkResetByLocalUser,
    InviteLinkResetByOtherUser { updater: NamedUser },
    InviteLinkResetByUnknownUser,
    InviteLinkEnabledWithoutApprovalByLocalUser,
    InviteLinkEnabledWithoutApprovalByOtherUser { updater: NamedUser },
    InviteLinkEnabledWithoutApprovalByUnknownUser,
    InviteLinkEnabledWithApprovalByLocalUser,
    InviteLinkEnabledWithApprovalByOtherUser { updater: NamedUser },
    InviteLinkEnabledWithApprovalByUnknownUser,
    InviteLinkDisabledByLocalUser,
    InviteLinkDisabledByOtherUser { updater: NamedUser },
    InviteLinkDisabledByUnknownUser,
    InviteLinkApprovalDisabledByLocalUser,
    InviteLinkApprovalDisabledByOtherUser { updater: NamedUser },
    InviteLinkApprovalDisabledByUnknownUser,
    InviteLinkApprovalEnabledByLocalUser,
    InviteLinkApprovalEnabledByOtherUser { updater: NamedUser },
    InviteLinkApprovalEnabledByUnknownUser,

    LocalUserJoinedViaInviteLink,
    OtherUserJoinedViaInviteLink { user: NamedUser },
}

impl GroupUpdateItem {
    /// Whether a message made of this item should surface its thread in the inbox.
    pub fn should_appear_in_inbox(&self) -> bool {
        !matches!(
            self,
            GroupUpdateItem::WasMigrated
                | GroupUpdateItem::LocalUserLeft
                | GroupUpdateItem::OtherUserLeft { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Aci;
    use uuid::Uuid;

    #[test]
    fn inbox_visibility() {
        let user = NamedUser {
            name: "Alice".to_string(),
            address: Aci::from_uuid(Uuid::new_v4()).into(),
        };
        assert!(!GroupUpdateItem::WasMigrated.should_appear_in_inbox());
        assert!(!GroupUpdateItem::LocalUserLeft.should_appear_in_inbox());
        assert!(!GroupUpdateItem::OtherUserLeft { user: user.clone() }.should_appear_in_inbox());
        assert!(GroupUpdateItem::OtherUserJoined { user }.should_appear_in_inbox());
        assert!(GroupUpdateItem::CreatedByLocalUser.should_appear_in_inbox());
    }
}
