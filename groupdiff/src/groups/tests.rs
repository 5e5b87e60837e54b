// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use uuid::Uuid;

use crate::{
    address::{Aci, Pni, ServiceId, UpdaterAddress},
    state::{ContactRecord, ContactsManager, InMemoryContacts},
    LocalIdentifiers,
};

use super::{
    builder::GroupUpdateItemBuilder,
    update_item::{GroupUpdateItem, NamedUser},
    update_record::{GroupUpdateRecord, GroupUpdateRecords},
    AccessRequired, DisappearingMessageToken, GroupId, GroupMembership, GroupModel, MemberRole,
};

fn aci(n: u128) -> Aci {
    Aci::from_uuid(Uuid::from_u128(n))
}

fn group(revision: u32, membership: GroupMembership) -> GroupModel {
    GroupModel::new(GroupId::V2([7; 32]), revision, membership)
}

struct Fixture {
    local: LocalIdentifiers,
    alice: Aci,
    bob: Aci,
    carol: Aci,
    contacts: InMemoryContacts,
}

fn fixture() -> Fixture {
    let local = LocalIdentifiers::new(
        aci(5),
        Some(Pni::from_uuid(Uuid::from_u128(6))),
        Some("+15550000000".to_string()),
    );
    let alice = aci(1);
    let bob = aci(3);
    let carol = aci(4);
    let contacts = InMemoryContacts::with_contacts(
        local.clone(),
        vec![
            ContactRecord {
                aci: Some(alice),
                e164: Some("+15551234567".to_string()),
                given_name: Some("Alice".to_string()),
                ..Default::default()
            },
            ContactRecord {
                aci: Some(bob),
                given_name: Some("Bob".to_string()),
                ..Default::default()
            },
        ],
    );
    Fixture {
        local,
        alice,
        bob,
        carol,
        contacts,
    }
}

impl Fixture {
    fn builder(&self) -> GroupUpdateItemBuilder<'_, InMemoryContacts, InMemoryContacts> {
        GroupUpdateItemBuilder::new(&self.contacts, &self.contacts)
    }

    fn named(&self, aci: Aci) -> NamedUser {
        let address = ServiceId::Aci(aci);
        NamedUser {
            name: self.contacts.display_name(&address),
            address,
        }
    }

    fn diff(&self, old: &GroupModel, new: &GroupModel, hint: Option<UpdaterAddress>) -> Vec<GroupUpdateItem> {
        self.builder()
            .diff_by_models(old, new, None, None, hint.as_ref(), false, false)
    }

    fn diff_tokens(
        &self,
        old: &GroupModel,
        new: &GroupModel,
        old_token: Option<DisappearingMessageToken>,
        new_token: Option<DisappearingMessageToken>,
        hint: Option<UpdaterAddress>,
    ) -> Vec<GroupUpdateItem> {
        self.builder()
            .diff_by_models(old, new, old_token, new_token, hint.as_ref(), false, false)
    }
}

#[test]
fn unchanged_group_gets_a_generic_item() {
    let f = fixture();
    let model = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));

    assert_eq!(
        f.diff(&model, &model, Some(f.alice.into())),
        vec![GroupUpdateItem::GenericUpdateByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    assert_eq!(
        f.diff(&model, &model, None),
        vec![GroupUpdateItem::GenericUpdateByUnknownUser]
    );
}

#[test]
fn known_local_attributes_everything_to_local_user() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));
    let mut new = group(2, old.membership.clone().with_full_member(f.bob, MemberRole::Normal));
    new.name = Some("Book club".to_string());

    let items = f.builder().diff_by_models(
        &old,
        &new,
        Some(DisappearingMessageToken::disabled()),
        Some(DisappearingMessageToken::from_duration(60)),
        Some(&f.alice.into()),
        true,
        false,
    );
    assert_eq!(
        items,
        vec![
            GroupUpdateItem::OtherUserAddedByLocalUser { user: f.named(f.bob) },
            GroupUpdateItem::NameChangedByLocalUser {
                new_group_name: "Book club".to_string()
            },
            GroupUpdateItem::DisappearingMessagesEnabledByLocalUser { duration_ms: 60_000 },
        ]
    );
}

#[test]
fn unchanged_members_are_not_mentioned() {
    let f = fixture();
    let invitee = Pni::from_uuid(Uuid::new_v4());
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(invitee, MemberRole::Normal, Some(f.alice))
            .with_requesting_member(f.bob),
    );
    let new = group(2, old.membership.clone().with_full_member(f.carol, MemberRole::Normal));

    assert_eq!(
        f.diff(&old, &new, Some(f.alice.into())),
        vec![GroupUpdateItem::OtherUserAddedByOtherUser {
            updater: f.named(f.alice),
            user: f.named(f.carol)
        }]
    );
}

#[test]
fn invites_by_others_are_counted() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    let mut membership = old.membership.clone();
    for _ in 0..3 {
        membership = membership.with_invited_member(Pni::from_uuid(Uuid::new_v4()), MemberRole::Normal, Some(f.alice));
    }
    let new = group(2, membership);

    assert_eq!(
        f.diff(&old, &new, Some(f.alice.into())),
        vec![GroupUpdateItem::UnnamedUsersWereInvitedByOtherUser {
            updater: f.named(f.alice),
            count: 3
        }]
    );
}

#[test]
fn invites_by_local_user_are_named() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));
    let new = group(
        2,
        old.membership
            .clone()
            .with_invited_member(f.bob, MemberRole::Normal, Some(f.local.aci))
            .with_invited_member(f.carol, MemberRole::Normal, Some(f.local.aci)),
    );

    assert_eq!(
        f.diff(&old, &new, Some(f.local.aci.into())),
        vec![
            GroupUpdateItem::OtherUserWasInvitedByLocalUser { user: f.named(f.bob) },
            GroupUpdateItem::OtherUserWasInvitedByLocalUser { user: f.named(f.carol) },
        ]
    );
}

#[test]
fn invalid_invites_are_counted() {
    let f = fixture();
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invalid_invite(vec![1; 16]),
    );
    let new = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invalid_invite(vec![2; 16])
            .with_invalid_invite(vec![3; 16]),
    );

    assert_eq!(
        f.diff(&old, &new, Some(f.alice.into())),
        vec![
            GroupUpdateItem::UnnamedUsersWereInvitedByOtherUser {
                updater: f.named(f.alice),
                count: 2
            },
            GroupUpdateItem::UnnamedUserInvitesWereRevokedByOtherUser {
                updater: f.named(f.alice),
                count: 1
            },
        ]
    );
}

#[test]
fn local_user_first_and_updater_last() {
    let f = fixture();
    // Alice sorts first on her own, so she only ends up last by being the updater.
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal)
            .with_full_member(f.local.aci, MemberRole::Normal),
    );
    let new = group(2, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));

    assert_eq!(
        f.diff(&old, &new, Some(f.alice.into())),
        vec![
            GroupUpdateItem::LocalUserWasGrantedAdministratorByOtherUser {
                updater: f.named(f.alice)
            },
            GroupUpdateItem::OtherUserRemoved {
                remover: f.named(f.alice),
                user: f.named(f.bob)
            },
            GroupUpdateItem::OtherUserLeft { user: f.named(f.alice) },
        ]
    );
}

#[test]
fn local_updater_is_narrated_last() {
    let f = fixture();
    let local = aci(0);
    let local_identifiers = LocalIdentifiers::new(local, None, None);
    let contacts = InMemoryContacts::with_contacts(local_identifiers, f.contacts.contacts.clone());
    let builder = GroupUpdateItemBuilder::new(&contacts, &contacts);

    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(local, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal),
    );
    let new = group(2, GroupMembership::new().with_full_member(local, MemberRole::Normal));

    // Moving the updater to the end beats moving the local user to the front.
    assert_eq!(
        builder.diff_by_models(&old, &new, None, None, Some(&local.into()), false, false),
        vec![
            GroupUpdateItem::OtherUserRemovedByLocalUser { user: f.named(f.bob) },
            GroupUpdateItem::LocalUserWasRevokedAdministratorByLocalUser,
        ]
    );

    // With no identity to move, the local user stays in front.
    assert_eq!(
        builder.diff_by_models(&old, &new, None, None, None, true, false),
        vec![
            GroupUpdateItem::LocalUserWasRevokedAdministratorByLocalUser,
            GroupUpdateItem::OtherUserRemovedByLocalUser { user: f.named(f.bob) },
        ]
    );
}

#[test]
fn translation_is_repeatable() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    let mut new = group(
        2,
        old.membership
            .clone()
            .with_full_member(f.bob, MemberRole::Normal)
            .with_requesting_member(f.carol),
    );
    new.description = Some("Monthly".to_string());

    let builder = f.builder();
    let records = builder.records_by_models(&old, &new, None, None, Some(&f.alice.into()), false, false);
    let stored = GroupUpdateRecords::from(records.clone()).to_json().unwrap();
    let loaded = GroupUpdateRecords::from_json(&stored).unwrap().into_inner();
    assert_eq!(loaded, records);

    let first = builder.translate_precomputed(&loaded, &f.local);
    let second = builder.translate_precomputed(&loaded, &f.local);
    assert_eq!(first, second);
    assert_eq!(first, f.diff(&old, &new, Some(f.alice.into())));
}

#[test]
fn empty_translation_still_yields_an_item() {
    let f = fixture();
    assert_eq!(
        f.builder().translate_precomputed(&[], &f.local),
        vec![GroupUpdateItem::GenericUpdateByUnknownUser]
    );
}

#[test]
fn request_sequences_without_repeats_degrade() {
    let f = fixture();
    let records = vec![GroupUpdateRecord::SequenceOfInviteLinkRequestAndCancels {
        requester: f.bob,
        count: 0,
        is_tail: false,
    }];
    assert_eq!(
        f.builder().translate_precomputed(&records, &f.local),
        vec![GroupUpdateItem::OtherUserRequestedToJoin { user: f.named(f.bob) }]
    );
}

#[test]
fn timer_after_local_join_is_unattributed() {
    let f = fixture();
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_requesting_member(f.local.aci),
    );
    let new = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member_via_join_request(f.local.aci, MemberRole::Normal),
    );

    assert_eq!(
        f.diff_tokens(
            &old,
            &new,
            Some(DisappearingMessageToken::disabled()),
            Some(DisappearingMessageToken::from_duration(3600)),
            Some(f.alice.into())
        ),
        vec![
            GroupUpdateItem::LocalUserRequestApproved {
                approver: f.named(f.alice)
            },
            GroupUpdateItem::DisappearingMessagesEnabledByUnknownUser { duration_ms: 3_600_000 },
        ]
    );
}

#[test]
fn new_group_created_by_local_user() {
    let f = fixture();
    let new = group(0, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));

    let expected = vec![
        GroupUpdateItem::CreatedByLocalUser,
        GroupUpdateItem::InviteFriendsToNewlyCreatedGroup,
    ];
    assert_eq!(
        f.builder()
            .diff_for_new_group(&new, None, Some(&f.local.aci.into()), false),
        expected
    );
    assert_eq!(f.builder().diff_for_new_group(&new, None, None, true), expected);
}

#[test]
fn new_group_created_by_someone_else() {
    let f = fixture();
    let new = group(
        0,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.local.aci, MemberRole::Normal),
    );

    assert_eq!(
        f.builder()
            .diff_for_new_group(&new, None, Some(&f.alice.into()), false),
        vec![GroupUpdateItem::CreatedByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    // Being added is implied by the creation, whoever made it.
    assert_eq!(
        f.builder().diff_for_new_group(&new, None, None, false),
        vec![GroupUpdateItem::CreatedByUnknownUser]
    );
}

#[test]
fn new_group_seen_as_a_full_member() {
    let f = fixture();
    let membership = GroupMembership::new()
        .with_full_member(f.alice, MemberRole::Administrator)
        .with_full_member(f.local.aci, MemberRole::Normal);
    let mut new = group(3, membership);

    assert_eq!(
        f.builder()
            .diff_for_new_group(&new, None, Some(&f.alice.into()), false),
        vec![GroupUpdateItem::LocalUserAddedByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    assert_eq!(
        f.builder().diff_for_new_group(&new, None, None, true),
        vec![GroupUpdateItem::LocalUserAddedByUnknownUser]
    );
    assert_eq!(
        f.builder().diff_for_new_group(&new, None, None, false),
        vec![GroupUpdateItem::LocalUserAddedByUnknownUser]
    );

    new.did_just_add_self_via_group_link = true;
    assert_eq!(
        f.builder().diff_for_new_group(&new, None, None, true),
        vec![GroupUpdateItem::LocalUserJoined]
    );
    // A named updater still wins over the link flag.
    assert_eq!(
        f.builder()
            .diff_for_new_group(&new, None, Some(&f.alice.into()), false),
        vec![GroupUpdateItem::LocalUserAddedByOtherUser {
            updater: f.named(f.alice)
        }]
    );
}

#[test]
fn new_group_seen_from_an_invite() {
    let f = fixture();
    let new = group(
        4,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(f.local.pni.unwrap(), MemberRole::Normal, Some(f.alice)),
    );

    assert_eq!(
        f.builder()
            .diff_for_new_group(&new, Some(DisappearingMessageToken::from_duration(60)), None, false),
        vec![
            GroupUpdateItem::LocalUserWasInvitedByOtherUser {
                updater: f.named(f.alice)
            },
            GroupUpdateItem::DisappearingMessagesEnabledByUnknownUser { duration_ms: 60_000 },
        ]
    );
}

#[test]
fn new_group_edge_cases() {
    let f = fixture();
    let v1 = GroupModel::new(
        GroupId::V1([7; 16]),
        0,
        GroupMembership::new().with_full_member(f.local.aci, MemberRole::Normal),
    );
    assert_eq!(
        f.builder().diff_for_new_group(&v1, None, None, true),
        vec![GroupUpdateItem::CreatedByUnknownUser]
    );

    let without_us = group(3, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    assert_eq!(
        f.builder().diff_for_new_group(&without_us, None, None, false),
        vec![GroupUpdateItem::GenericUpdateByUnknownUser]
    );
}

#[test]
fn admin_granted_by_other_user() {
    let f = fixture();
    let a = f.carol;
    let old = group(1, GroupMembership::new().with_full_member(a, MemberRole::Normal));
    let new = group(2, GroupMembership::new().with_full_member(a, MemberRole::Administrator));

    assert_eq!(
        f.diff(&old, &new, Some(f.bob.into())),
        vec![GroupUpdateItem::OtherUserWasGrantedAdministratorByOtherUser {
            updater: f.named(f.bob),
            user: f.named(a)
        }]
    );
}

#[test]
fn timer_enabled_by_local_user() {
    let f = fixture();
    let model = group(1, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));

    assert_eq!(
        f.diff_tokens(
            &model,
            &model,
            Some(DisappearingMessageToken::new(false, 0)),
            Some(DisappearingMessageToken::new(true, 604_800)),
            Some(f.local.aci.into())
        ),
        vec![GroupUpdateItem::DisappearingMessagesEnabledByLocalUser {
            duration_ms: 604_800_000
        }]
    );
}

#[test]
fn timer_without_baseline() {
    let f = fixture();
    let model = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    let enabled = Some(DisappearingMessageToken::from_duration(30));

    assert_eq!(
        f.diff_tokens(&model, &model, None, enabled, Some(f.alice.into())),
        vec![GroupUpdateItem::DisappearingMessagesObservedWithoutBaselineByUnknownUser { duration_ms: 30_000 }]
    );
    assert_eq!(
        f.diff_tokens(&model, &model, None, enabled, Some(f.local.aci.into())),
        vec![GroupUpdateItem::DisappearingMessagesObservedWithoutBaselineByLocalUser { duration_ms: 30_000 }]
    );
    assert_eq!(
        f.diff_tokens(
            &model,
            &model,
            None,
            Some(DisappearingMessageToken::disabled()),
            Some(f.alice.into())
        ),
        vec![GroupUpdateItem::GenericUpdateByOtherUser {
            updater: f.named(f.alice)
        }]
    );
}

#[test]
fn default_items() {
    let f = fixture();
    let builder = f.builder();
    assert_eq!(
        builder.default_item(Some(&f.alice.into()), false),
        GroupUpdateItem::GenericUpdateByOtherUser {
            updater: f.named(f.alice)
        }
    );
    assert_eq!(builder.default_item(None, false), GroupUpdateItem::GenericUpdateByUnknownUser);
    assert_eq!(builder.default_item(None, true), GroupUpdateItem::GenericUpdateByLocalUser);
    assert_eq!(
        builder.default_item(Some(&f.local.pni.unwrap().into()), false),
        GroupUpdateItem::GenericUpdateByLocalUser
    );
}

#[test]
fn phone_number_updater_is_resolved() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    let mut new = old.clone();
    new.revision = 2;
    new.name = Some("  Renamed ".to_string());

    assert_eq!(
        f.diff(&old, &new, Some(UpdaterAddress::Phone("+15551234567".to_string()))),
        vec![GroupUpdateItem::NameChangedByOtherUser {
            updater: f.named(f.alice),
            new_group_name: "Renamed".to_string()
        }]
    );
}

#[test]
fn attribute_and_access_changes() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.local.aci, MemberRole::Administrator));
    let mut new = old.clone();
    new.revision = 2;
    new.name = Some("Club".to_string());
    new.set_avatar(Some(&b"avatar bytes"[..]));
    new.access.members = AccessRequired::Administrator;

    assert_eq!(
        f.diff(&old, &new, Some(f.local.aci.into())),
        vec![
            GroupUpdateItem::NameChangedByLocalUser {
                new_group_name: "Club".to_string()
            },
            GroupUpdateItem::AvatarChangedByLocalUser,
            GroupUpdateItem::MembersAccessChangedByLocalUser {
                new_access: AccessRequired::Administrator
            },
        ]
    );

    let mut cleared = new.clone();
    cleared.revision = 3;
    cleared.name = Some("   ".to_string());
    cleared.set_avatar(None);
    assert_eq!(
        f.diff(&new, &cleared, Some(f.alice.into())),
        vec![
            GroupUpdateItem::NameRemovedByOtherUser {
                updater: f.named(f.alice)
            },
            GroupUpdateItem::AvatarRemovedByOtherUser {
                updater: f.named(f.alice)
            },
        ]
    );
}

#[test]
fn v1_groups_skip_v2_passes() {
    let f = fixture();
    let old = GroupModel::new(
        GroupId::V1([7; 16]),
        0,
        GroupMembership::new().with_full_member(f.alice, MemberRole::Normal),
    );
    let mut new = old.clone();
    new.name = Some("Old school".to_string());
    new.description = Some("Ignored".to_string());
    new.is_announcements_only = true;

    assert_eq!(
        f.diff(&old, &new, None),
        vec![GroupUpdateItem::NameChangedByUnknownUser {
            new_group_name: "Old school".to_string()
        }]
    );
}

#[test]
fn invite_link_transitions() {
    let f = fixture();
    let disabled = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));

    let mut open = disabled.clone();
    open.invite_link_password = Some(vec![1, 2, 3]);
    open.access.add_from_invite_link = AccessRequired::Any;

    let mut approval = open.clone();
    approval.access.add_from_invite_link = AccessRequired::Administrator;

    let mut reset = approval.clone();
    reset.invite_link_password = Some(vec![4, 5, 6]);

    assert_eq!(
        f.diff(&disabled, &open, Some(f.alice.into())),
        vec![GroupUpdateItem::InviteLinkEnabledWithoutApprovalByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    assert_eq!(
        f.diff(&disabled, &approval, Some(f.local.aci.into())),
        vec![GroupUpdateItem::InviteLinkEnabledWithApprovalByLocalUser]
    );
    assert_eq!(
        f.diff(&open, &approval, None),
        vec![GroupUpdateItem::InviteLinkApprovalEnabledByUnknownUser]
    );
    assert_eq!(
        f.diff(&approval, &open, None),
        vec![GroupUpdateItem::InviteLinkApprovalDisabledByUnknownUser]
    );
    assert_eq!(
        f.diff(&approval, &disabled, Some(f.alice.into())),
        vec![GroupUpdateItem::InviteLinkDisabledByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    assert_eq!(
        f.diff(&approval, &reset, Some(f.alice.into())),
        vec![GroupUpdateItem::InviteLinkResetByOtherUser {
            updater: f.named(f.alice)
        }]
    );
}

#[test]
fn announcement_only_toggles() {
    let f = fixture();
    let old = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    let mut announcements = old.clone();
    announcements.is_announcements_only = true;

    assert_eq!(
        f.diff(&old, &announcements, Some(f.alice.into())),
        vec![GroupUpdateItem::AnnouncementOnlyEnabledByOtherUser {
            updater: f.named(f.alice)
        }]
    );
    assert_eq!(
        f.diff(&announcements, &old, Some(f.alice.into())),
        vec![GroupUpdateItem::AnnouncementOnlyDisabledByOtherUser {
            updater: f.named(f.alice)
        }]
    );
}

#[test]
fn placeholder_only_narrates_local_user() {
    let f = fixture();
    let mut placeholder = group(0, GroupMembership::new().with_requesting_member(f.local.aci));
    placeholder.is_join_request_placeholder = true;

    let mut new = group(
        5,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal)
            .with_full_member_via_join_request(f.local.aci, MemberRole::Normal),
    );
    new.name = Some("Club".to_string());

    assert_eq!(
        f.diff(&placeholder, &new, Some(f.alice.into())),
        vec![GroupUpdateItem::LocalUserRequestApproved {
            approver: f.named(f.alice)
        }]
    );

    // Undecryptable invites are still counted.
    new.membership = new.membership.clone().with_invalid_invite(vec![9; 16]);
    assert_eq!(
        f.diff(&placeholder, &new, Some(f.alice.into())),
        vec![
            GroupUpdateItem::LocalUserRequestApproved {
                approver: f.named(f.alice)
            },
            GroupUpdateItem::UnnamedUsersWereInvitedByOtherUser {
                updater: f.named(f.alice),
                count: 1
            },
        ]
    );
}

#[test]
fn local_only_skips_other_members_and_attributes() {
    let f = fixture();
    let mut old = group(
        3,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal)
            .with_invited_member(f.local.aci, MemberRole::Normal, Some(f.alice)),
    );
    old.name = Some("Old".to_string());
    let mut new = group(
        4,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.carol, MemberRole::Normal)
            .with_full_member(f.local.aci, MemberRole::Normal),
    );
    new.name = Some("New".to_string());

    let old_token = Some(DisappearingMessageToken::disabled());
    let new_token = Some(DisappearingMessageToken::from_duration(3600));
    let hint = UpdaterAddress::from(f.local.aci);
    let diff = |local_only: bool| {
        f.builder()
            .diff_by_models(&old, &new, old_token, new_token, Some(&hint), false, local_only)
    };

    assert_eq!(
        diff(true),
        vec![
            GroupUpdateItem::LocalUserAcceptedInviteFromInviter {
                inviter: f.named(f.alice)
            },
            GroupUpdateItem::DisappearingMessagesEnabledByLocalUser { duration_ms: 3_600_000 },
        ]
    );

    let everything = diff(false);
    assert!(everything.contains(&GroupUpdateItem::OtherUserRemovedByLocalUser {
        user: f.named(f.bob)
    }));
    assert!(everything.contains(&GroupUpdateItem::OtherUserAddedByLocalUser {
        user: f.named(f.carol)
    }));
    assert!(everything.contains(&GroupUpdateItem::NameChangedByLocalUser {
        new_group_name: "New".to_string()
    }));

    let records = f
        .builder()
        .records_by_models(&old, &new, old_token, new_token, Some(&hint), false, true);
    assert_eq!(
        records,
        vec![
            GroupUpdateRecord::LocalUserAcceptedInviteFromInviter { inviter_aci: f.alice },
            GroupUpdateRecord::DisappearingMessagesEnabledByLocalUser { duration_ms: 3_600_000 },
        ]
    );
}

#[test]
fn migration_replaces_everything() {
    let f = fixture();
    let old = group(0, GroupMembership::new().with_full_member(f.alice, MemberRole::Normal));
    let mut new = group(1, GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator));
    new.name = Some("Migrated".to_string());
    new.was_just_migrated = true;

    assert_eq!(f.diff(&old, &new, None), vec![GroupUpdateItem::WasMigrated]);
}

#[test]
fn member_left_then_was_invited() {
    let f = fixture();
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal),
    );
    let new = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(f.bob, MemberRole::Normal, Some(f.alice)),
    );

    assert_eq!(
        f.diff(&old, &new, Some(f.alice.into())),
        vec![
            GroupUpdateItem::OtherUserLeft { user: f.named(f.bob) },
            GroupUpdateItem::UnnamedUsersWereInvitedByOtherUser {
                updater: f.named(f.alice),
                count: 1
            },
        ]
    );
}

#[test]
fn invites_accepted_declined_and_revoked() {
    let f = fixture();
    let pni = Pni::from_uuid(Uuid::new_v4());
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(f.bob, MemberRole::Normal, Some(f.alice))
            .with_invited_member(pni, MemberRole::Normal, Some(f.alice))
            .with_invited_member(f.carol, MemberRole::Normal, None),
    );

    let accepted = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_full_member(f.bob, MemberRole::Normal)
            .with_invited_member(pni, MemberRole::Normal, Some(f.alice))
            .with_invited_member(f.carol, MemberRole::Normal, None),
    );
    assert_eq!(
        f.diff(&old, &accepted, Some(f.bob.into())),
        vec![GroupUpdateItem::OtherUserAcceptedInviteFromInviter {
            user: f.named(f.bob),
            inviter: f.named(f.alice)
        }]
    );

    let declined = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(f.bob, MemberRole::Normal, Some(f.alice))
            .with_invited_member(f.carol, MemberRole::Normal, None),
    );
    assert_eq!(
        f.diff(&old, &declined, Some(pni.into())),
        vec![GroupUpdateItem::OtherUserDeclinedInviteFromInviter {
            inviter: f.named(f.alice)
        }]
    );

    let revoked = group(
        2,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(f.bob, MemberRole::Normal, Some(f.alice))
            .with_invited_member(pni, MemberRole::Normal, Some(f.alice)),
    );
    assert_eq!(
        f.diff(&old, &revoked, Some(f.alice.into())),
        vec![GroupUpdateItem::UnnamedUserInvitesWereRevokedByOtherUser {
            updater: f.named(f.alice),
            count: 1
        }]
    );
    assert_eq!(
        f.diff(&old, &revoked, Some(f.local.aci.into())),
        vec![GroupUpdateItem::OtherUserInviteRevokedByLocalUser { user: f.named(f.carol) }]
    );
}

#[test]
fn join_requests_and_invite_links() {
    let f = fixture();
    let base = GroupMembership::new().with_full_member(f.alice, MemberRole::Administrator);
    let old = group(1, base.clone().with_requesting_member(f.bob));

    assert_eq!(
        f.diff(&old, &group(2, base.clone()), Some(f.bob.into())),
        vec![GroupUpdateItem::OtherUserRequestCanceledByOtherUser {
            requester: f.named(f.bob)
        }]
    );
    assert_eq!(
        f.diff(&old, &group(2, base.clone()), Some(f.alice.into())),
        vec![GroupUpdateItem::OtherUserRequestRejectedByOtherUser {
            updater: f.named(f.alice),
            requester: f.named(f.bob)
        }]
    );

    let linked = group(2, base.clone().with_full_member_via_invite_link(f.carol, MemberRole::Normal));
    assert_eq!(
        f.diff(&group(1, base.clone()), &linked, Some(f.carol.into())),
        vec![GroupUpdateItem::OtherUserJoinedViaInviteLink { user: f.named(f.carol) }]
    );
    assert_eq!(
        f.diff(&group(1, base), &linked, Some(f.alice.into())),
        vec![GroupUpdateItem::OtherUserAddedByUnknownUser { user: f.named(f.carol) }]
    );
}

#[test]
fn legacy_records_upgrade_and_translate() {
    use super::update_record::LegacyGroupUpdateRecord;
    use super::update_source::GroupUpdateSource;

    let f = fixture();
    let pni = Pni::from_uuid(Uuid::new_v4());
    let old = group(
        1,
        GroupMembership::new()
            .with_full_member(f.alice, MemberRole::Administrator)
            .with_invited_member(pni, MemberRole::Normal, Some(f.alice)),
    );
    let legacy = LegacyGroupUpdateRecord::InvitedPniPromotedToFullMemberAci { pni, aci: f.bob };
    let record = legacy
        .to_new_record(&GroupUpdateSource::Aci(f.bob), Some(&old), &f.local)
        .unwrap();

    assert_eq!(
        f.builder().translate_precomputed(&[record], &f.local),
        vec![GroupUpdateItem::OtherUserAcceptedInviteFromInviter {
            user: f.named(f.bob),
            inviter: f.named(f.alice)
        }]
    );
}
