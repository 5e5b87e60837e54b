// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

//! Turns stored records into displayable items, looking up names as we go.

use crate::{
    address::{Aci, ServiceId},
    state::ContactsManager,
    LocalIdentifiers,
};

use super::{
    update_item::{GroupUpdateItem, NamedUser},
    update_record::GroupUpdateRecord,
};

pub struct RecordTranslator<'a, C: ContactsManager + ?Sized> {
    contacts: &'a C,
    local_identifiers: &'a LocalIdentifiers,
}

impl<'a, C: ContactsManager + ?Sized> RecordTranslator<'a, C> {
    pub fn new(contacts: &'a C, local_identifiers: &'a LocalIdentifiers) -> Self {
        RecordTranslator {
            contacts,
            local_identifiers,
        }
    }

    fn named(&self, service_id: impl Into<ServiceId>) -> NamedUser {
        let address = service_id.into();
        NamedUser {
            name: self.contacts.display_name(&address),
            address,
        }
    }

    fn is_local_aci(&self, aci: &Aci) -> bool {
        *aci == self.local_identifiers.aci
    }

    pub fn translate_all(&self, records: &[GroupUpdateRecord]) -> Vec<GroupUpdateItem> {
        records.iter().map(|record| self.translate(record)).collect()
    }

    pub fn translate(&self, record: &GroupUpdateRecord) -> GroupUpdateItem {
        use GroupUpdateItem as Item;
        use GroupUpdateRecord as Record;

        match record {
            Record::SequenceOfInviteLinkRequestAndCancels {
                requester,
                count,
                is_tail,
            } => {
                if *count == 0 {
                    // Nothing collapsed into it, so it's an ordinary request.
                    Item::OtherUserRequestedToJoin {
                        user: self.named(*requester),
                    }
                } else {
                    Item::SequenceOfInviteLinkRequestAndCancels {
                        user: self.named(*requester),
                        count: *count,
                        is_tail: *is_tail,
                    }
                }
            }
            Record::InvitedPniPromotedToFullMemberAci {
                new_member,
                inviter,
            } => {
                if self.is_local_aci(new_member) {
                    match inviter {
                        Some(inviter) => Item::LocalUserAcceptedInviteFromInviter {
                            inviter: self.named(*inviter),
                        },
                        None => Item::LocalUserAcceptedInviteFromUnknownUser,
                    }
                } else {
                    let user = self.named(*new_member);
                    match inviter {
                        Some(inviter) if self.is_local_aci(inviter) => {
                            Item::OtherUserAcceptedInviteFromLocalUser { user }
                        }
                        Some(inviter) => Item::OtherUserAcceptedInviteFromInviter {
                            user,
                            inviter: self.named(*inviter),
                        },
                        None => Item::OtherUserAcceptedInviteFromUnknownUser { user },
                    }
                }
            }

            Record::GenericUpdateByLocalUser => Item::GenericUpdateByLocalUser,
            Record::GenericUpdateByOtherUser { updater_aci } => Item::GenericUpdateByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::GenericUpdateByUnknownUser => Item::GenericUpdateByUnknownUser,

            Record::CreatedByLocalUser => Item::CreatedByLocalUser,
            Record::CreatedByOtherUser { updater_aci } => Item::CreatedByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::CreatedByUnknownUser => Item::CreatedByUnknownUser,
            Record::InviteFriendsToNewlyCreatedGroup => Item::InviteFriendsToNewlyCreatedGroup,

            Record::WasMigrated => Item::WasMigrated,
            Record::LocalUserInvitedAfterMigration => Item::LocalUserInvitedAfterMigration,
            Record::OtherUsersInvitedAfterMigration { count } => {
                Item::OtherUsersInvitedAfterMigration { count: *count }
            }
            Record::OtherUsersDroppedAfterMigration { count } => {
                Item::OtherUsersDroppedAfterMigration { count: *count }
            }

            Record::NameChangedByLocalUser { new_group_name } => Item::NameChangedByLocalUser {
                new_group_name: new_group_name.clone(),
            },
            Record::NameChangedByOtherUser {
                updater_aci,
                new_group_name,
            } => Item::NameChangedByOtherUser {
                updater: self.named(*updater_aci),
                new_group_name: new_group_name.clone(),
            },
            Record::NameChangedByUnknownUser { new_group_name } => Item::NameChangedByUnknownUser {
                new_group_name: new_group_name.clone(),
            },
            Record::NameRemovedByLocalUser => Item::NameRemovedByLocalUser,
            Record::NameRemovedByOtherUser { updater_aci } => Item::NameRemovedByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::NameRemovedByUnknownUser => Item::NameRemovedByUnknownUser,

            Record::AvatarChangedByLocalUser => Item::AvatarChangedByLocalUser,
            Record::AvatarChangedByOtherUser { updater_aci } => Item::AvatarChangedByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::AvatarChangedByUnknownUser => Item::AvatarChangedByUnknownUser,
            Record::AvatarRemovedByLocalUser => Item::AvatarRemovedByLocalUser,
            Record::AvatarRemovedByOtherUser { updater_aci } => Item::AvatarRemovedByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::AvatarRemovedByUnknownUser => Item::AvatarRemovedByUnknownUser,

            Record::DescriptionChangedByLocalUser { new_description } => {
                Item::DescriptionChangedByLocalUser {
                    new_description: new_description.clone(),
                }
            }
            Record::DescriptionChangedByOtherUser {
                updater_aci,
                new_description,
            } => Item::DescriptionChangedByOtherUser {
                updater: self.named(*updater_aci),
                new_description: new_description.clone(),
            },
            Record::DescriptionChangedByUnknownUser { new_description } => {
                Item::DescriptionChangedByUnknownUser {
                    new_description: new_description.clone(),
                }
            }
            Record::DescriptionRemovedByLocalUser => Item::DescriptionRemovedByLocalUser,
            Record::DescriptionRemovedByOtherUser { updater_aci } => {
                Item::DescriptionRemovedByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::DescriptionRemovedByUnknownUser => Item::DescriptionRemovedByUnknownUser,

            Record::MembersAccessChangedByLocalUser { new_access } => {
                Item::MembersAccessChangedByLocalUser {
                    new_access: *new_access,
                }
            }
            Record::MembersAccessChangedByOtherUser {
                updater_aci,
                new_access,
            } => Item::MembersAccessChangedByOtherUser {
                updater: self.named(*updater_aci),
                new_access: *new_access,
            },
            Record::MembersAccessChangedByUnknownUser { new_access } => {
                Item::MembersAccessChangedByUnknownUser {
                    new_access: *new_access,
                }
            }
            Record::AttributesAccessChangedByLocalUser { new_access } => {
                Item::AttributesAccessChangedByLocalUser {
                    new_access: *new_access,
                }
            }
            Record::AttributesAccessChangedByOtherUser {
                updater_aci,
                new_access,
            } => Item::AttributesAccessChangedByOtherUser {
                updater: self.named(*updater_aci),
                new_access: *new_access,
            },
            Record::AttributesAccessChangedByUnknownUser { new_access } => {
                Item::AttributesAccessChangedByUnknownUser {
                    new_access: *new_access,
                }
            }

            Record::AnnouncementOnlyEnabledByLocalUser => Item::AnnouncementOnlyEnabledByLocalUser,
            Record::AnnouncementOnlyEnabledByOtherUser { updater_aci } => {
                Item::AnnouncementOnlyEnabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::AnnouncementOnlyEnabledByUnknownUser => Item::AnnouncementOnlyEnabledByUnknownUser,
            Record::AnnouncementOnlyDisabledByLocalUser => Item::AnnouncementOnlyDisabledByLocalUser,
            Record::AnnouncementOnlyDisabledByOtherUser { updater_aci } => {
                Item::AnnouncementOnlyDisabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::AnnouncementOnlyDisabledByUnknownUser => {
                Item::AnnouncementOnlyDisabledByUnknownUser
            }

            Record::LocalUserWasGrantedAdministratorByLocalUser => {
                Item::LocalUserWasGrantedAdministratorByLocalUser
            }
            Record::LocalUserWasGrantedAdministratorByOtherUser { updater_aci } => {
                Item::LocalUserWasGrantedAdministratorByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::LocalUserWasGrantedAdministratorByUnknownUser => {
                Item::LocalUserWasGrantedAdministratorByUnknownUser
            }
            Record::OtherUserWasGrantedAdministratorByLocalUser { user_aci } => {
                Item::OtherUserWasGrantedAdministratorByLocalUser {
                    user: self.named(*user_aci),
                }
            }
            Record::OtherUserWasGrantedAdministratorByOtherUser {
                updater_aci,
                user_aci,
            } => Item::OtherUserWasGrantedAdministratorByOtherUser {
                updater: self.named(*updater_aci),
                user: self.named(*user_aci),
            },
            Record::OtherUserWasGrantedAdministratorByUnknownUser { user_aci } => {
                Item::OtherUserWasGrantedAdministratorByUnknownUser {
                    user: self.named(*user_aci),
                }
            }
            Record::LocalUserWasRevokedAdministratorByLocalUser => {
                Item::LocalUserWasRevokedAdministratorByLocalUser
            }
            Record::LocalUserWasRevokedAdministratorByOtherUser { updater_aci } => {
                Item::LocalUserWasRevokedAdministratorByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::LocalUserWasRevokedAdministratorByUnknownUser => {
                Item::LocalUserWasRevokedAdministratorByUnknownUser
            }
            Record::OtherUserWasRevokedAdministratorByLocalUser { user_aci } => {
                Item::OtherUserWasRevokedAdministratorByLocalUser {
                    user: self.named(*user_aci),
                }
            }
            Record::OtherUserWasRevokedAdministratorByOtherUser {
                updater_aci,
                user_aci,
            } => Item::OtherUserWasRevokedAdministratorByOtherUser {
                updater: self.named(*updater_aci),
                user: self.named(*user_aci),
            },
            Record::OtherUserWasRevokedAdministratorByUnknownUser { user_aci } => {
                Item::OtherUserWasRevokedAdministratorByUnknownUser {
                    user: self.named(*user_aci),
                }
            }

            Record::LocalUserLeft => Item::LocalUserLeft,
            Record::LocalUserRemoved { remover_aci } => Item::LocalUserRemoved {
                remover: self.named(*remover_aci),
            },
            Record::LocalUserRemovedByUnknownUser => Item::LocalUserRemovedByUnknownUser,
            Record::OtherUserLeft { user_aci } => Item::OtherUserLeft {
                user: self.named(*user_aci),
            },
            Record::OtherUserRemovedByLocalUser { user_aci } => Item::OtherUserRemovedByLocalUser {
                user: self.named(*user_aci),
            },
            Record::OtherUserRemoved {
                remover_aci,
                user_aci,
            } => Item::OtherUserRemoved {
                remover: self.named(*remover_aci),
                user: self.named(*user_aci),
            },
            Record::OtherUserRemovedByUnknownUser { user_aci } => {
                Item::OtherUserRemovedByUnknownUser {
                    user: self.named(*user_aci),
                }
            }

            Record::LocalUserWasInvitedByLocalUser => Item::LocalUserWasInvitedByLocalUser,
            Record::LocalUserWasInvitedByOtherUser { updater_aci } => {
                Item::LocalUserWasInvitedByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::LocalUserWasInvitedByUnknownUser => Item::LocalUserWasInvitedByUnknownUser,
            Record::OtherUserWasInvitedByLocalUser { invitee } => {
                Item::OtherUserWasInvitedByLocalUser {
                    user: self.named(*invitee),
                }
            }
            Record::UnnamedUsersWereInvitedByLocalUser { count } => {
                Item::UnnamedUsersWereInvitedByLocalUser { count: *count }
            }
            Record::UnnamedUsersWereInvitedByOtherUser { updater_aci, count } => {
                Item::UnnamedUsersWereInvitedByOtherUser {
                    updater: self.named(*updater_aci),
                    count: *count,
                }
            }
            Record::UnnamedUsersWereInvitedByUnknownUser { count } => {
                Item::UnnamedUsersWereInvitedByUnknownUser { count: *count }
            }

            Record::LocalUserAcceptedInviteFromInviter { inviter_aci } => {
                Item::LocalUserAcceptedInviteFromInviter {
                    inviter: self.named(*inviter_aci),
                }
            }
            Record::LocalUserAcceptedInviteFromUnknownUser => {
                Item::LocalUserAcceptedInviteFromUnknownUser
            }
            Record::OtherUserAcceptedInviteFromLocalUser { user_aci } => {
                Item::OtherUserAcceptedInviteFromLocalUser {
                    user: self.named(*user_aci),
                }
            }
            Record::OtherUserAcceptedInviteFromInviter {
                user_aci,
                inviter_aci,
            } => Item::OtherUserAcceptedInviteFromInviter {
                user: self.named(*user_aci),
                inviter: self.named(*inviter_aci),
            },
            Record::OtherUserAcceptedInviteFromUnknownUser { user_aci } => {
                Item::OtherUserAcceptedInviteFromUnknownUser {
                    user: self.named(*user_aci),
                }
            }

            Record::LocalUserJoined => Item::LocalUserJoined,
            Record::OtherUserJoined { user_aci } => Item::OtherUserJoined {
                user: self.named(*user_aci),
            },

            Record::LocalUserAddedByLocalUser => Item::LocalUserAddedByLocalUser,
            Record::LocalUserAddedByOtherUser { updater_aci } => Item::LocalUserAddedByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::LocalUserAddedByUnknownUser => Item::LocalUserAddedByUnknownUser,
            Record::OtherUserAddedByLocalUser { user_aci } => Item::OtherUserAddedByLocalUser {
                user: self.named(*user_aci),
            },
            Record::OtherUserAddedByOtherUser {
                updater_aci,
                user_aci,
            } => Item::OtherUserAddedByOtherUser {
                updater: self.named(*updater_aci),
                user: self.named(*user_aci),
            },
            Record::OtherUserAddedByUnknownUser { user_aci } => Item::OtherUserAddedByUnknownUser {
                user: self.named(*user_aci),
            },

            Record::LocalUserDeclinedInviteFromInviter { inviter_aci } => {
                Item::LocalUserDeclinedInviteFromInviter {
                    inviter: self.named(*inviter_aci),
                }
            }
            Record::LocalUserDeclinedInviteFromUnknownUser => {
                Item::LocalUserDeclinedInviteFromUnknownUser
            }
            Record::OtherUserDeclinedInviteFromLocalUser { invitee } => {
                Item::OtherUserDeclinedInviteFromLocalUser {
                    user: self.named(*invitee),
                }
            }
            // Whoever declined stays anonymous; only their inviter is shown.
            Record::OtherUserDeclinedInviteFromInviter { inviter_aci, .. }
            | Record::UnnamedUserDeclinedInviteFromInviter { inviter_aci } => {
                Item::OtherUserDeclinedInviteFromInviter {
                    inviter: self.named(*inviter_aci),
                }
            }
            Record::OtherUserDeclinedInviteFromUnknownUser { .. }
            | Record::UnnamedUserDeclinedInviteFromUnknownUser => {
                Item::OtherUserDeclinedInviteFromUnknownUser
            }

            Record::LocalUserInviteRevoked { revoker_aci } => Item::LocalUserInviteRevoked {
                revoker: self.named(*revoker_aci),
            },
            Record::LocalUserInviteRevokedByUnknownUser => Item::LocalUserInviteRevokedByUnknownUser,
            Record::OtherUserInviteRevokedByLocalUser { invitee } => {
                Item::OtherUserInviteRevokedByLocalUser {
                    user: self.named(*invitee),
                }
            }
            Record::UnnamedUserInvitesWereRevokedByLocalUser { count } => {
                Item::UnnamedUserInvitesWereRevokedByLocalUser { count: *count }
            }
            Record::UnnamedUserInvitesWereRevokedByOtherUser { updater_aci, count } => {
                Item::UnnamedUserInvitesWereRevokedByOtherUser {
                    updater: self.named(*updater_aci),
                    count: *count,
                }
            }
            Record::UnnamedUserInvitesWereRevokedByUnknownUser { count } => {
                Item::UnnamedUserInvitesWereRevokedByUnknownUser { count: *count }
            }

            Record::LocalUserRequestedToJoin => Item::LocalUserRequestedToJoin,
            Record::OtherUserRequestedToJoin { user_aci } => Item::OtherUserRequestedToJoin {
                user: self.named(*user_aci),
            },
            Record::LocalUserRequestApproved { approver_aci } => Item::LocalUserRequestApproved {
                approver: self.named(*approver_aci),
            },
            Record::LocalUserRequestApprovedByUnknownUser => {
                Item::LocalUserRequestApprovedByUnknownUser
            }
            Record::OtherUserRequestApprovedByLocalUser { user_aci } => {
                Item::OtherUserRequestApprovedByLocalUser {
                    user: self.named(*user_aci),
                }
            }
            Record::OtherUserRequestApproved {
                user_aci,
                approver_aci,
            } => Item::OtherUserRequestApproved {
                user: self.named(*user_aci),
                approver: self.named(*approver_aci),
            },
            Record::OtherUserRequestApprovedByUnknownUser { user_aci } => {
                Item::OtherUserRequestApprovedByUnknownUser {
                    user: self.named(*user_aci),
                }
            }
            Record::LocalUserRequestCanceledByLocalUser => Item::LocalUserRequestCanceledByLocalUser,
            Record::LocalUserRequestRejectedByUnknownUser => {
                Item::LocalUserRequestRejectedByUnknownUser
            }
            Record::OtherUserRequestRejectedByLocalUser { requester_aci } => {
                Item::OtherUserRequestRejectedByLocalUser {
                    requester: self.named(*requester_aci),
                }
            }
            Record::OtherUserRequestRejectedByOtherUser {
                updater_aci,
                requester_aci,
            } => Item::OtherUserRequestRejectedByOtherUser {
                updater: self.named(*updater_aci),
                requester: self.named(*requester_aci),
            },
            Record::OtherUserRequestCanceledByOtherUser { requester_aci } => {
                Item::OtherUserRequestCanceledByOtherUser {
                    requester: self.named(*requester_aci),
                }
            }
            Record::OtherUserRequestRejectedByUnknownUser { requester_aci } => {
                Item::OtherUserRequestRejectedByUnknownUser {
                    requester: self.named(*requester_aci),
                }
            }

            Record::DisappearingMessagesEnabledByLocalUser { duration_ms } => {
                Item::DisappearingMessagesEnabledByLocalUser {
                    duration_ms: *duration_ms,
                }
            }
            Record::DisappearingMessagesEnabledByOtherUser {
                updater_aci,
                duration_ms,
            } => Item::DisappearingMessagesEnabledByOtherUser {
                updater: self.named(*updater_aci),
                duration_ms: *duration_ms,
            },
            Record::DisappearingMessagesEnabledByUnknownUser { duration_ms } => {
                Item::DisappearingMessagesEnabledByUnknownUser {
                    duration_ms: *duration_ms,
                }
            }
            Record::DisappearingMessagesDisabledByLocalUser => {
                Item::DisappearingMessagesDisabledByLocalUser
            }
            Record::DisappearingMessagesDisabledByOtherUser { updater_aci } => {
                Item::DisappearingMessagesDisabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::DisappearingMessagesDisabledByUnknownUser => {
                Item::DisappearingMessagesDisabledByUnknownUser
            }
            Record::DisappearingMessagesObservedWithoutBaselineByLocalUser { duration_ms } => {
                Item::DisappearingMessagesObservedWithoutBaselineByLocalUser {
                    duration_ms: *duration_ms,
                }
            }
            Record::DisappearingMessagesObservedWithoutBaselineByUnknownUser { duration_ms } => {
                Item::DisappearingMessagesObservedWithoutBaselineByUnknownUser {
                    duration_ms: *duration_ms,
                }
            }

            Record::InviteLinkResetByLocalUser => Item::InviteLinkResetByLocalUser,
            Record::InviteLinkResetByOtherUser { updater_aci } => Item::InviteLinkResetByOtherUser {
                updater: self.named(*updater_aci),
            },
            Record::InviteLinkResetByUnknownUser => Item::InviteLinkResetByUnknownUser,
            Record::InviteLinkEnabledWithoutApprovalByLocalUser => {
                Item::InviteLinkEnabledWithoutApprovalByLocalUser
            }
            Record::InviteLinkEnabledWithoutApprovalByOtherUser { updater_aci } => {
                Item::InviteLinkEnabledWithoutApprovalByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::InviteLinkEnabledWithoutApprovalByUnknownUser => {
                Item::InviteLinkEnabledWithoutApprovalByUnknownUser
            }
            Record::InviteLinkEnabledWithApprovalByLocalUser => {
                Item::InviteLinkEnabledWithApprovalByLocalUser
            }
            Record::InviteLinkEnabledWithApprovalByOtherUser { updater_aci } => {
                Item::InviteLinkEnabledWithApprovalByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::InviteLinkEnabledWithApprovalByUnknownUser => {
                Item::InviteLinkEnabledWithApprovalByUnknownUser
            }
            Record::InviteLinkDisabledByLocalUser => Item::InviteLinkDisabledByLocalUser,
            Record::InviteLinkDisabledByOtherUser { updater_aci } => {
                Item::InviteLinkDisabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::InviteLinkDisabledByUnknownUser => Item::InviteLinkDisabledByUnknownUser,
            Record::InviteLinkApprovalDisabledByLocalUser => {
                Item::InviteLinkApprovalDisabledByLocalUser
            }
            Record::InviteLinkApprovalDisabledByOtherUser { updater_aci } => {
                Item::InviteLinkApprovalDisabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::InviteLinkApprovalDisabledByUnknownUser => {
                Item::InviteLinkApprovalDisabledByUnknownUser
            }
            Record::InviteLinkApprovalEnabledByLocalUser => Item::InviteLinkApprovalEnabledByLocalUser,
            Record::InviteLinkApprovalEnabledByOtherUser { updater_aci } => {
                Item::InviteLinkApprovalEnabledByOtherUser {
                    updater: self.named(*updater_aci),
                }
            }
            Record::InviteLinkApprovalEnabledByUnknownUser => {
                Item::InviteLinkApprovalEnabledByUnknownUser
            }

            Record::LocalUserJoinedViaInviteLink => Item::LocalUserJoinedViaInviteLink,
            Record::OtherUserJoinedViaInviteLink { user_aci } => {
                Item::OtherUserJoinedViaInviteLink {
                    user: self.named(*user_aci),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address::Pni,
        state::{ContactRecord, InMemoryContacts},
    };
    use uuid::Uuid;

    fn setup() -> (LocalIdentifiers, InMemoryContacts, Aci, Aci) {
        let local = LocalIdentifiers::new(Aci::from_uuid(Uuid::new_v4()), None, None);
        let alice = Aci::from_uuid(Uuid::new_v4());
        let bob = Aci::from_uuid(Uuid::new_v4());
        let contacts = InMemoryContacts::with_contacts(
            local.clone(),
            vec![
                ContactRecord {
                    aci: Some(alice),
                    given_name: Some("Alice".to_string()),
                    ..Default::default()
                },
                ContactRecord {
                    aci: Some(bob),
                    profile_name: Some("Bob".to_string()),
                    ..Default::default()
                },
            ],
        );
        (local, contacts, alice, bob)
    }

    #[test]
    fn names_are_resolved() {
        let (local, contacts, alice, bob) = setup();
        let translator = RecordTranslator::new(&contacts, &local);

        let item = translator.translate(&GroupUpdateRecord::OtherUserAddedByOtherUser {
            updater_aci: alice,
            user_aci: bob,
        });
        assert_eq!(
            item,
            GroupUpdateItem::OtherUserAddedByOtherUser {
                updater: NamedUser {
                    name: "Alice".to_string(),
                    address: alice.into()
                },
                user: NamedUser {
                    name: "Bob".to_string(),
                    address: bob.into()
                },
            }
        );
    }

    #[test]
    fn empty_request_sequence_is_a_plain_request() {
        let (local, contacts, alice, _) = setup();
        let translator = RecordTranslator::new(&contacts, &local);

        let plain = translator.translate(&GroupUpdateRecord::SequenceOfInviteLinkRequestAndCancels {
            requester: alice,
            count: 0,
            is_tail: true,
        });
        assert!(matches!(plain, GroupUpdateItem::OtherUserRequestedToJoin { user } if user.address == ServiceId::from(alice)));

        let collapsed = translator.translate(&GroupUpdateRecord::SequenceOfInviteLinkRequestAndCancels {
            requester: alice,
            count: 3,
            is_tail: false,
        });
        assert!(matches!(
            collapsed,
            GroupUpdateItem::SequenceOfInviteLinkRequestAndCancels {
                count: 3,
                is_tail: false,
                ..
            }
        ));
    }

    #[test]
    fn pni_promotion() {
        let (local, contacts, alice, bob) = setup();
        let translator = RecordTranslator::new(&contacts, &local);

        assert!(matches!(
            translator.translate(&GroupUpdateRecord::InvitedPniPromotedToFullMemberAci {
                new_member: local.aci,
                inviter: Some(alice),
            }),
            GroupUpdateItem::LocalUserAcceptedInviteFromInviter { inviter } if inviter.name == "Alice"
        ));
        assert!(matches!(
            translator.translate(&GroupUpdateRecord::InvitedPniPromotedToFullMemberAci {
                new_member: bob,
                inviter: Some(local.aci),
            }),
            GroupUpdateItem::OtherUserAcceptedInviteFromLocalUser { .. }
        ));
        assert!(matches!(
            translator.translate(&GroupUpdateRecord::InvitedPniPromotedToFullMemberAci {
                new_member: bob,
                inviter: None,
            }),
            GroupUpdateItem::OtherUserAcceptedInviteFromUnknownUser { .. }
        ));
    }

    #[test]
    fn declines_hide_the_invitee() {
        let (local, contacts, alice, _) = setup();
        let translator = RecordTranslator::new(&contacts, &local);
        let invitee: ServiceId = Pni::from_uuid(Uuid::new_v4()).into();

        let named = translator.translate(&GroupUpdateRecord::OtherUserDeclinedInviteFromInviter {
            invitee,
            inviter_aci: alice,
        });
        let unnamed =
            translator.translate(&GroupUpdateRecord::UnnamedUserDeclinedInviteFromInviter { inviter_aci: alice });
        assert_eq!(named, unnamed);

        assert_eq!(
            translator.translate(&GroupUpdateRecord::OtherUserDeclinedInviteFromUnknownUser { invitee }),
            GroupUpdateItem::OtherUserDeclinedInviteFromUnknownUser
        );
    }
}
