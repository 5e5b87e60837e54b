// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use log::warn;

use crate::LocalIdentifiers;

use super::{
    diff::disappearing_message_update_record,
    membership::MembershipStatus,
    update_record::GroupUpdateRecord,
    update_source::{GroupUpdateSource, UpdateSource},
    DisappearingMessageToken, GroupModel,
};

/// Records for a group we have no earlier snapshot of: either we made it, or we were just let in.
pub fn new_group_update_records(
    new_model: &GroupModel,
    new_token: Option<DisappearingMessageToken>,
    source: &GroupUpdateSource,
    local_identifiers: &LocalIdentifiers,
) -> Vec<GroupUpdateRecord> {
    let updater = source.attribution();
    let mut records = Vec::new();

    if let Some(record) = group_inserted_record(new_model, updater, local_identifiers) {
        records.push(record);
    }

    // Whoever set the timer did it before we could see the group.
    if let Some(record) = disappearing_message_update_record(updater, None, new_token, true) {
        records.push(record);
    }

    if records.contains(&GroupUpdateRecord::CreatedByLocalUser) {
        records.push(GroupUpdateRecord::InviteFriendsToNewlyCreatedGroup);
    }

    records
}

/// The one record saying how we came to know the group.
///
/// A revision 0 group was just created, which implies everyone in it was added. Past that we
/// narrate the local user's own status.
fn group_inserted_record(
    new_model: &GroupModel,
    updater: UpdateSource,
    local_identifiers: &LocalIdentifiers,
) -> Option<GroupUpdateRecord> {
    if !new_model.is_v2() {
        return Some(GroupUpdateRecord::CreatedByUnknownUser);
    }
    if new_model.is_first_revision() {
        return Some(match updater {
            UpdateSource::LocalUser => GroupUpdateRecord::CreatedByLocalUser,
            UpdateSource::OtherUser(updater_aci) => GroupUpdateRecord::CreatedByOtherUser { updater_aci },
            UpdateSource::Unknown => GroupUpdateRecord::CreatedByUnknownUser,
        });
    }

    match MembershipStatus::local(local_identifiers, &new_model.membership) {
        MembershipStatus::NormalMember { .. } => Some(match updater {
            UpdateSource::OtherUser(updater_aci) => {
                GroupUpdateRecord::LocalUserAddedByOtherUser { updater_aci }
            }
            UpdateSource::LocalUser | UpdateSource::Unknown
                if new_model.did_just_add_self_via_group_link =>
            {
                GroupUpdateRecord::LocalUserJoined
            }
            UpdateSource::LocalUser | UpdateSource::Unknown => {
                GroupUpdateRecord::LocalUserAddedByUnknownUser
            }
        }),
        MembershipStatus::Invited { invited_by, .. } => Some(match invited_by {
            Some(updater_aci) => GroupUpdateRecord::LocalUserWasInvitedByOtherUser { updater_aci },
            None => GroupUpdateRecord::LocalUserWasInvitedByUnknownUser,
        }),
        MembershipStatus::Requesting { .. } => Some(GroupUpdateRecord::LocalUserRequestedToJoin),
        MembershipStatus::NotMember => {
            warn!("Group was inserted without local membership!");
            None
        }
    }
}
