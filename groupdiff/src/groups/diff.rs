// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

//! Diffs two snapshots of a group into persistable update records.

use std::collections::BTreeSet;

use log::warn;

use crate::{
    address::{Aci, ServiceId},
    LocalIdentifiers,
};

use super::{
    membership::{GroupMembership, MemberRole, MembershipStatus},
    update_record::GroupUpdateRecord,
    update_source::{GroupUpdateSource, UpdateSource},
    DisappearingMessageToken, GroupModel, InviteLinkMode,
};

/// Invites we only count, because we can't (or shouldn't) name who they were for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnnamedInviteCounts {
    pub new_invite_count: u32,
    pub revoked_invite_count: u32,
}

/// Record for the current disappearing message timer, if the change to it is worth reporting.
///
/// `force_unknown_attribution` is for when the local user has just joined: they can't know who
/// set the timer, so an enabled timer is reported without an author.
pub fn disappearing_message_update_record(
    updater: UpdateSource,
    old_token: Option<DisappearingMessageToken>,
    new_token: Option<DisappearingMessageToken>,
    force_unknown_attribution: bool,
) -> Option<GroupUpdateRecord> {
    // Older updates didn't carry the timer at all.
    let new_token = new_token?;
    let duration_ms = new_token.duration_ms();

    if force_unknown_attribution && new_token.is_enabled {
        return Some(GroupUpdateRecord::DisappearingMessagesEnabledByUnknownUser { duration_ms });
    }

    let old_token = match old_token {
        Some(old_token) if old_token == new_token => return None,
        Some(old_token) => old_token,
        None => {
            // Nothing to diff against, so we can't say that anybody changed it.
            if new_token.is_enabled && duration_ms > 0 {
                return Some(match updater {
                    UpdateSource::LocalUser => {
                        GroupUpdateRecord::DisappearingMessagesObservedWithoutBaselineByLocalUser {
                            duration_ms,
                        }
                    }
                    UpdateSource::OtherUser(_) | UpdateSource::Unknown => {
                        GroupUpdateRecord::DisappearingMessagesObservedWithoutBaselineByUnknownUser {
                            duration_ms,
                        }
                    }
                });
            }
            return None;
        }
    };
    debug_assert_ne!(old_token, new_token);

    let record = if new_token.is_enabled && duration_ms > 0 {
        match updater {
            UpdateSource::LocalUser => {
                GroupUpdateRecord::DisappearingMessagesEnabledByLocalUser { duration_ms }
            }
            UpdateSource::OtherUser(updater_aci) => {
                GroupUpdateRecord::DisappearingMessagesEnabledByOtherUser {
                    updater_aci,
                    duration_ms,
                }
            }
            UpdateSource::Unknown => {
                GroupUpdateRecord::DisappearingMessagesEnabledByUnknownUser { duration_ms }
            }
        }
    } else {
        match updater {
            UpdateSource::LocalUser => GroupUpdateRecord::DisappearingMessagesDisabledByLocalUser,
            UpdateSource::OtherUser(updater_aci) => {
                GroupUpdateRecord::DisappearingMessagesDisabledByOtherUser { updater_aci }
            }
            UpdateSource::Unknown => GroupUpdateRecord::DisappearingMessagesDisabledByUnknownUser,
        }
    };
    Some(record)
}

/// Walks every dimension of a group that can change between two revisions and
/// records what changed, in order.
pub struct DiffingGroupUpdateRecordBuilder<'a> {
    local_identifiers: &'a LocalIdentifiers,
    source: &'a GroupUpdateSource,
    updater: UpdateSource,
    /// Only narrate the local user's own membership change.
    local_only: bool,
    records: Vec<GroupUpdateRecord>,
}

impl<'a> DiffingGroupUpdateRecordBuilder<'a> {
    pub fn new(
        source: &'a GroupUpdateSource,
        local_identifiers: &'a LocalIdentifiers,
        local_only: bool,
    ) -> Self {
        DiffingGroupUpdateRecordBuilder {
            local_identifiers,
            source,
            updater: source.attribution(),
            local_only,
            records: Vec::new(),
        }
    }

    /// Diff two snapshots. May return an empty list; callers substitute a generic record.
    pub fn build(
        mut self,
        old_model: &GroupModel,
        new_model: &GroupModel,
        old_token: Option<DisappearingMessageToken>,
        new_token: Option<DisappearingMessageToken>,
    ) -> Vec<GroupUpdateRecord> {
        // A placeholder only ever held our own pending request.
        self.local_only |= old_model.is_v2() && old_model.is_join_request_placeholder;

        if self.local_only {
            self.add_membership_updates(old_model, new_model);
            self.add_disappearing_message_updates(old_token, new_token);
        } else if new_model.was_just_migrated {
            self.add_migration_updates();
        } else {
            self.add_membership_updates(old_model, new_model);
            self.add_attributes_updates(old_model, new_model);
            self.add_access_updates(old_model, new_model);
            self.add_disappearing_message_updates(old_token, new_token);
            self.add_invite_link_updates(old_model, new_model);
            self.add_announcement_only_updates(old_model, new_model);
        }

        if *self.source == GroupUpdateSource::Unknown {
            warn!("Missing updater info!");
        }

        self.records
    }

    fn add(&mut self, record: GroupUpdateRecord) {
        self.records.push(record);
    }

    /// Pick the record matching who made this change.
    fn by_updater(
        &self,
        local: GroupUpdateRecord,
        other: impl FnOnce(Aci) -> GroupUpdateRecord,
        unknown: GroupUpdateRecord,
    ) -> GroupUpdateRecord {
        match self.updater {
            UpdateSource::LocalUser => local,
            UpdateSource::OtherUser(updater_aci) => other(updater_aci),
            UpdateSource::Unknown => unknown,
        }
    }

    fn is_local_aci(&self, aci: &Aci) -> bool {
        *aci == self.local_identifiers.aci
    }

    // Attributes

    fn add_attributes_updates(&mut self, old_model: &GroupModel, new_model: &GroupModel) {
        if old_model.stripped_name() != new_model.stripped_name() {
            let record = match new_model.stripped_name() {
                Some(name) => self.by_updater(
                    GroupUpdateRecord::NameChangedByLocalUser {
                        new_group_name: name.to_string(),
                    },
                    |updater_aci| GroupUpdateRecord::NameChangedByOtherUser {
                        updater_aci,
                        new_group_name: name.to_string(),
                    },
                    GroupUpdateRecord::NameChangedByUnknownUser {
                        new_group_name: name.to_string(),
                    },
                ),
                None => self.by_updater(
                    GroupUpdateRecord::NameRemovedByLocalUser,
                    |updater_aci| GroupUpdateRecord::NameRemovedByOtherUser { updater_aci },
                    GroupUpdateRecord::NameRemovedByUnknownUser,
                ),
            };
            self.add(record);
        }

        if old_model.avatar_hash != new_model.avatar_hash {
            let record = if new_model.has_avatar() {
                self.by_updater(
                    GroupUpdateRecord::AvatarChangedByLocalUser,
                    |updater_aci| GroupUpdateRecord::AvatarChangedByOtherUser { updater_aci },
                    GroupUpdateRecord::AvatarChangedByUnknownUser,
                )
            } else {
                self.by_updater(
                    GroupUpdateRecord::AvatarRemovedByLocalUser,
                    |updater_aci| GroupUpdateRecord::AvatarRemovedByOtherUser { updater_aci },
                    GroupUpdateRecord::AvatarRemovedByUnknownUser,
                )
            };
            self.add(record);
        }

        if !(old_model.is_v2() && new_model.is_v2()) {
            return;
        }

        if old_model.stripped_description() != new_model.stripped_description() {
            let record = match new_model.stripped_description() {
                Some(description) => self.by_updater(
                    GroupUpdateRecord::DescriptionChangedByLocalUser {
                        new_description: description.to_string(),
                    },
                    |updater_aci| GroupUpdateRecord::DescriptionChangedByOtherUser {
                        updater_aci,
                        new_description: description.to_string(),
                    },
                    GroupUpdateRecord::DescriptionChangedByUnknownUser {
                        new_description: description.to_string(),
                    },
                ),
                None => self.by_updater(
                    GroupUpdateRecord::DescriptionRemovedByLocalUser,
                    |updater_aci| GroupUpdateRecord::DescriptionRemovedByOtherUser { updater_aci },
                    GroupUpdateRecord::DescriptionRemovedByUnknownUser,
                ),
            };
            self.add(record);
        }
    }

    // Access

    fn add_access_updates(&mut self, old_model: &GroupModel, new_model: &GroupModel) {
        if !old_model.is_v2() {
            return;
        }
        if !new_model.is_v2() {
            warn!("Invalid group model: a v2 group turned back into a v1 group.");
            return;
        }

        let old_access = old_model.access;
        let new_access = new_model.access;

        if old_access.members != new_access.members {
            let new_access = new_access.members;
            let record = self.by_updater(
                GroupUpdateRecord::MembersAccessChangedByLocalUser { new_access },
                |updater_aci| GroupUpdateRecord::MembersAccessChangedByOtherUser {
                    updater_aci,
                    new_access,
                },
                GroupUpdateRecord::MembersAccessChangedByUnknownUser { new_access },
            );
            self.add(record);
        }

        if old_access.attributes != new_access.attributes {
            let new_access = new_access.attributes;
            let record = self.by_updater(
                GroupUpdateRecord::AttributesAccessChangedByLocalUser { new_access },
                |updater_aci| GroupUpdateRecord::AttributesAccessChangedByOtherUser {
                    updater_aci,
                    new_access,
                },
                GroupUpdateRecord::AttributesAccessChangedByUnknownUser { new_access },
            );
            self.add(record);
        }
    }

    // Membership

    /// Everyone in either snapshot: local identities first, the updater last, everyone else in
    /// service ID order.
    pub fn ordered_service_ids(
        &self,
        old_membership: &GroupMembership,
        new_membership: &GroupMembership,
    ) -> Vec<ServiceId> {
        let all: BTreeSet<ServiceId> = old_membership
            .all_members_of_any_kind()
            .chain(new_membership.all_members_of_any_kind())
            .copied()
            .collect();
        let mut service_ids: Vec<ServiceId> = all.into_iter().collect();

        let local_aci = self.local_identifiers.aci_service_id();
        let local_pni = self.local_identifiers.pni_service_id();
        // Stable, so everyone else keeps their relative order.
        service_ids.sort_by_key(|id| {
            if *id == local_aci {
                0
            } else if Some(*id) == local_pni {
                1
            } else {
                2
            }
        });

        if let Some(updater) = self.source.updater_service_id() {
            if let Some(position) = service_ids.iter().position(|id| *id == updater) {
                let updater = service_ids.remove(position);
                service_ids.push(updater);
            }
        }

        if self.local_only {
            service_ids.retain(|id| self.local_identifiers.contains(id));
        }
        service_ids
    }

    fn add_membership_updates(&mut self, old_model: &GroupModel, new_model: &GroupModel) {
        let old_membership = &old_model.membership;
        let new_membership = &new_model.membership;
        let mut unnamed_invite_counts = UnnamedInviteCounts::default();

        for service_id in self.ordered_service_ids(old_membership, new_membership) {
            let old_status = MembershipStatus::of(&service_id, old_membership);
            let new_status = MembershipStatus::of(&service_id, new_membership);
            if old_status == new_status {
                continue;
            }

            match (old_status, new_status) {
                (
                    MembershipStatus::NormalMember {
                        aci,
                        role: old_role,
                    },
                    MembershipStatus::NormalMember { role: new_role, .. },
                ) => self.add_member_role_updates(aci, old_role, new_role, new_model),
                (MembershipStatus::NormalMember { aci, .. }, MembershipStatus::Invited { .. }) => {
                    self.add_user_left_then_was_invited(aci)
                }
                (MembershipStatus::NormalMember { aci, .. }, MembershipStatus::Requesting { .. }) => {
                    // We missed the revisions between them leaving and asking to come back.
                    self.add_user_requested_to_join(aci)
                }
                (MembershipStatus::NormalMember { aci, .. }, MembershipStatus::NotMember) => {
                    self.add_user_left_or_was_removed(aci)
                }

                (
                    MembershipStatus::Invited { invited_by, .. },
                    MembershipStatus::NormalMember { aci, .. },
                ) => self.add_invited_user_accepted_or_was_added(aci, invited_by),
                (MembershipStatus::Invited { .. }, MembershipStatus::Invited { .. }) => {}
                (MembershipStatus::Invited { .. }, MembershipStatus::Requesting { aci }) => {
                    self.add_user_requested_to_join(aci)
                }
                (
                    MembershipStatus::Invited {
                        invitee,
                        invited_by,
                        ..
                    },
                    MembershipStatus::NotMember,
                ) => self.add_invite_declined_or_revoked(invitee, invited_by, &mut unnamed_invite_counts),

                (MembershipStatus::Requesting { aci }, MembershipStatus::NormalMember { .. }) => {
                    if new_membership.did_join_from_accepted_join_request(&aci) {
                        self.add_user_request_was_approved(aci)
                    } else {
                        self.add_user_was_added(aci, new_model)
                    }
                }
                (MembershipStatus::Requesting { aci }, MembershipStatus::Invited { .. }) => {
                    self.add_user_was_invited(ServiceId::Aci(aci), &mut unnamed_invite_counts)
                }
                (MembershipStatus::Requesting { .. }, MembershipStatus::Requesting { .. }) => {}
                (MembershipStatus::Requesting { aci }, MembershipStatus::NotMember) => {
                    self.add_user_request_was_rejected(aci)
                }

                (MembershipStatus::NotMember, MembershipStatus::NormalMember { aci, .. }) => {
                    if new_membership.did_join_from_invite_link(&aci) {
                        self.add_user_joined_from_invite_link(aci)
                    } else if new_membership.did_join_from_accepted_join_request(&aci) {
                        self.add_user_request_was_approved(aci)
                    } else {
                        self.add_user_was_added(aci, new_model)
                    }
                }
                (MembershipStatus::NotMember, MembershipStatus::Invited { invitee, .. }) => {
                    self.add_user_was_invited(invitee, &mut unnamed_invite_counts)
                }
                (MembershipStatus::NotMember, MembershipStatus::Requesting { aci }) => {
                    self.add_user_requested_to_join(aci)
                }
                (MembershipStatus::NotMember, MembershipStatus::NotMember) => {}
            }
        }

        self.add_unnamed_users_were_invited(unnamed_invite_counts.new_invite_count);
        self.add_unnamed_user_invites_were_revoked(unnamed_invite_counts.revoked_invite_count);
        self.add_invalid_invite_updates(old_membership, new_membership);
    }

    /// Invites we couldn't decrypt can only ever be reported as counts.
    fn add_invalid_invite_updates(
        &mut self,
        old_membership: &GroupMembership,
        new_membership: &GroupMembership,
    ) {
        let old_ids = old_membership.invalid_invite_user_ids();
        let new_ids = new_membership.invalid_invite_user_ids();
        let added = new_ids.difference(old_ids).count() as u32;
        let removed = old_ids.difference(new_ids).count() as u32;

        if added > 0 {
            let record = self.by_updater(
                GroupUpdateRecord::UnnamedUsersWereInvitedByLocalUser { count: added },
                |updater_aci| GroupUpdateRecord::UnnamedUsersWereInvitedByOtherUser {
                    updater_aci,
                    count: added,
                },
                GroupUpdateRecord::UnnamedUsersWereInvitedByUnknownUser { count: added },
            );
            self.add(record);
        }

        if removed > 0 {
            let record = self.by_updater(
                GroupUpdateRecord::UnnamedUserInvitesWereRevokedByLocalUser { count: removed },
                |updater_aci| GroupUpdateRecord::UnnamedUserInvitesWereRevokedByOtherUser {
                    updater_aci,
                    count: removed,
                },
                GroupUpdateRecord::UnnamedUserInvitesWereRevokedByUnknownUser { count: removed },
            );
            self.add(record);
        }
    }

    fn add_member_role_updates(
        &mut self,
        user_aci: Aci,
        old_role: MemberRole,
        new_role: MemberRole,
        new_model: &GroupModel,
    ) {
        match (old_role, new_role) {
            (MemberRole::Normal, MemberRole::Administrator) => {
                self.add_user_was_granted_administrator(user_aci, new_model)
            }
            (MemberRole::Administrator, MemberRole::Normal) => {
                self.add_user_was_revoked_administrator(user_aci)
            }
            _ => {}
        }
    }

    fn add_user_was_granted_administrator(&mut self, user_aci: Aci, new_model: &GroupModel) {
        if new_model.was_just_migrated {
            // Every v1 member becomes an admin on migration.
            return;
        }

        let record = if self.is_local_aci(&user_aci) {
            if self.updater == UpdateSource::LocalUser {
                warn!("Local user made themselves administrator!");
            }
            self.by_updater(
                GroupUpdateRecord::LocalUserWasGrantedAdministratorByLocalUser,
                |updater_aci| GroupUpdateRecord::LocalUserWasGrantedAdministratorByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::LocalUserWasGrantedAdministratorByUnknownUser,
            )
        } else {
            match self.updater {
                UpdateSource::LocalUser => {
                    GroupUpdateRecord::OtherUserWasGrantedAdministratorByLocalUser { user_aci }
                }
                UpdateSource::OtherUser(updater_aci) if updater_aci == user_aci => {
                    warn!("Remote user made themselves administrator!");
                    GroupUpdateRecord::OtherUserWasGrantedAdministratorByUnknownUser { user_aci }
                }
                UpdateSource::OtherUser(updater_aci) => {
                    GroupUpdateRecord::OtherUserWasGrantedAdministratorByOtherUser {
                        updater_aci,
                        user_aci,
                    }
                }
                UpdateSource::Unknown => {
                    GroupUpdateRecord::OtherUserWasGrantedAdministratorByUnknownUser { user_aci }
                }
            }
        };
        self.add(record);
    }

    fn add_user_was_revoked_administrator(&mut self, user_aci: Aci) {
        let record = if self.is_local_aci(&user_aci) {
            self.by_updater(
                GroupUpdateRecord::LocalUserWasRevokedAdministratorByLocalUser,
                |updater_aci| GroupUpdateRecord::LocalUserWasRevokedAdministratorByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::LocalUserWasRevokedAdministratorByUnknownUser,
            )
        } else {
            match self.updater {
                UpdateSource::LocalUser => {
                    GroupUpdateRecord::OtherUserWasRevokedAdministratorByLocalUser { user_aci }
                }
                UpdateSource::OtherUser(updater_aci) if updater_aci == user_aci => {
                    GroupUpdateRecord::OtherUserWasRevokedAdministratorByUnknownUser { user_aci }
                }
                UpdateSource::OtherUser(updater_aci) => {
                    GroupUpdateRecord::OtherUserWasRevokedAdministratorByOtherUser {
                        updater_aci,
                        user_aci,
                    }
                }
                UpdateSource::Unknown => {
                    GroupUpdateRecord::OtherUserWasRevokedAdministratorByUnknownUser { user_aci }
                }
            }
        };
        self.add(record);
    }

    fn add_user_left_or_was_removed(&mut self, user_aci: Aci) {
        let record = if self.is_local_aci(&user_aci) {
            self.by_updater(
                GroupUpdateRecord::LocalUserLeft,
                |remover_aci| GroupUpdateRecord::LocalUserRemoved { remover_aci },
                GroupUpdateRecord::LocalUserRemovedByUnknownUser,
            )
        } else {
            match self.updater {
                UpdateSource::LocalUser => GroupUpdateRecord::OtherUserRemovedByLocalUser { user_aci },
                UpdateSource::OtherUser(updater_aci) if updater_aci == user_aci => {
                    GroupUpdateRecord::OtherUserLeft { user_aci }
                }
                UpdateSource::OtherUser(remover_aci) => GroupUpdateRecord::OtherUserRemoved {
                    remover_aci,
                    user_aci,
                },
                UpdateSource::Unknown => GroupUpdateRecord::OtherUserRemovedByUnknownUser { user_aci },
            }
        };
        self.add(record);
    }

    fn add_user_left_then_was_invited(&mut self, user_aci: Aci) {
        if self.is_local_aci(&user_aci) {
            self.add(GroupUpdateRecord::LocalUserRemovedByUnknownUser);
            if self.updater == UpdateSource::LocalUser {
                warn!("User invited themselves to the group!");
            }
            let record = self.by_updater(
                GroupUpdateRecord::LocalUserWasInvitedByLocalUser,
                |updater_aci| GroupUpdateRecord::LocalUserWasInvitedByOtherUser { updater_aci },
                GroupUpdateRecord::LocalUserWasInvitedByUnknownUser,
            );
            self.add(record);
        } else {
            self.add(GroupUpdateRecord::OtherUserLeft { user_aci });
            let record = self.by_updater(
                GroupUpdateRecord::UnnamedUsersWereInvitedByLocalUser { count: 1 },
                |updater_aci| GroupUpdateRecord::UnnamedUsersWereInvitedByOtherUser {
                    updater_aci,
                    count: 1,
                },
                GroupUpdateRecord::UnnamedUsersWereInvitedByUnknownUser { count: 1 },
            );
            self.add(record);
        }
    }

    /// An invited ACI became a full member. Invites to a PNI accepted by the matching ACI arrive
    /// as their own record and never reach this.
    fn add_invited_user_accepted_or_was_added(&mut self, invitee_aci: Aci, inviter_aci: Option<Aci>) {
        let record = if self.is_local_aci(&invitee_aci) {
            match self.updater {
                UpdateSource::LocalUser => match inviter_aci {
                    Some(inviter_aci) => {
                        GroupUpdateRecord::LocalUserAcceptedInviteFromInviter { inviter_aci }
                    }
                    None => {
                        warn!("Missing inviter name!");
                        GroupUpdateRecord::LocalUserAcceptedInviteFromUnknownUser
                    }
                },
                UpdateSource::OtherUser(updater_aci) => {
                    GroupUpdateRecord::LocalUserAddedByOtherUser { updater_aci }
                }
                UpdateSource::Unknown => GroupUpdateRecord::LocalUserJoined,
            }
        } else {
            match self.updater {
                UpdateSource::LocalUser => GroupUpdateRecord::OtherUserAddedByLocalUser {
                    user_aci: invitee_aci,
                },
                UpdateSource::OtherUser(updater_aci) if updater_aci == invitee_aci => {
                    // The invitee accepted.
                    match inviter_aci {
                        Some(inviter_aci) if self.is_local_aci(&inviter_aci) => {
                            GroupUpdateRecord::OtherUserAcceptedInviteFromLocalUser {
                                user_aci: invitee_aci,
                            }
                        }
                        Some(inviter_aci) => GroupUpdateRecord::OtherUserAcceptedInviteFromInviter {
                            user_aci: invitee_aci,
                            inviter_aci,
                        },
                        None => {
                            warn!("Missing inviter name.");
                            GroupUpdateRecord::OtherUserAcceptedInviteFromUnknownUser {
                                user_aci: invitee_aci,
                            }
                        }
                    }
                }
                UpdateSource::OtherUser(updater_aci) => GroupUpdateRecord::OtherUserAddedByOtherUser {
                    updater_aci,
                    user_aci: invitee_aci,
                },
                UpdateSource::Unknown => GroupUpdateRecord::OtherUserJoined {
                    user_aci: invitee_aci,
                },
            }
        };
        self.add(record);
    }

    fn add_invite_declined_or_revoked(
        &mut self,
        invitee: ServiceId,
        inviter_aci: Option<Aci>,
        unnamed_invite_counts: &mut UnnamedInviteCounts,
    ) {
        if self.local_identifiers.contains(&invitee) {
            let record = match self.updater {
                UpdateSource::LocalUser => match inviter_aci {
                    Some(inviter_aci) => {
                        GroupUpdateRecord::LocalUserDeclinedInviteFromInviter { inviter_aci }
                    }
                    None => {
                        warn!("Missing inviter name!");
                        GroupUpdateRecord::LocalUserDeclinedInviteFromUnknownUser
                    }
                },
                UpdateSource::OtherUser(revoker_aci) => {
                    GroupUpdateRecord::LocalUserInviteRevoked { revoker_aci }
                }
                UpdateSource::Unknown => GroupUpdateRecord::LocalUserInviteRevokedByUnknownUser,
            };
            self.add(record);
            return;
        }

        let updater_service_id = match self.source {
            GroupUpdateSource::LocalUser { .. } => {
                self.add(GroupUpdateRecord::OtherUserInviteRevokedByLocalUser { invitee });
                return;
            }
            GroupUpdateSource::Aci(aci) => ServiceId::Aci(*aci),
            GroupUpdateSource::RejectedInviteToPni(pni) => ServiceId::Pni(*pni),
            GroupUpdateSource::LegacyE164(_) | GroupUpdateSource::Unknown => {
                unnamed_invite_counts.revoked_invite_count += 1;
                return;
            }
        };

        if invitee != updater_service_id {
            // Somebody else's invite was revoked. We don't name them.
            unnamed_invite_counts.revoked_invite_count += 1;
            return;
        }

        let record = match inviter_aci {
            Some(inviter_aci) if self.is_local_aci(&inviter_aci) => {
                GroupUpdateRecord::OtherUserDeclinedInviteFromLocalUser { invitee }
            }
            Some(inviter_aci) => GroupUpdateRecord::OtherUserDeclinedInviteFromInviter {
                invitee,
                inviter_aci,
            },
            None => GroupUpdateRecord::OtherUserDeclinedInviteFromUnknownUser { invitee },
        };
        self.add(record);
    }

    fn add_user_was_added(&mut self, new_member: Aci, new_model: &GroupModel) {
        let record = if new_model.did_just_add_self_via_group_link {
            GroupUpdateRecord::LocalUserJoined
        } else if self.is_local_aci(&new_member) {
            if self.updater == UpdateSource::LocalUser {
                warn!("User added themselves to the group and was updater - should not be possible.");
            }
            self.by_updater(
                GroupUpdateRecord::LocalUserAddedByLocalUser,
                |updater_aci| GroupUpdateRecord::LocalUserAddedByOtherUser { updater_aci },
                GroupUpdateRecord::LocalUserAddedByUnknownUser,
            )
        } else {
            match self.updater {
                UpdateSource::LocalUser => GroupUpdateRecord::OtherUserAddedByLocalUser {
                    user_aci: new_member,
                },
                UpdateSource::OtherUser(updater_aci) if updater_aci == new_member => {
                    warn!("Remote user added themselves to the group!");
                    GroupUpdateRecord::OtherUserAddedByUnknownUser {
                        user_aci: new_member,
                    }
                }
                UpdateSource::OtherUser(updater_aci) => GroupUpdateRecord::OtherUserAddedByOtherUser {
                    updater_aci,
                    user_aci: new_member,
                },
                UpdateSource::Unknown => GroupUpdateRecord::OtherUserAddedByUnknownUser {
                    user_aci: new_member,
                },
            }
        };
        self.add(record);
    }

    fn add_user_joined_from_invite_link(&mut self, new_member: Aci) {
        let record = if self.is_local_aci(&new_member) {
            match self.updater {
                UpdateSource::LocalUser => GroupUpdateRecord::LocalUserJoinedViaInviteLink,
                UpdateSource::OtherUser(_) => {
                    warn!("A user should never join the group via invite link unless they are the updater.");
                    GroupUpdateRecord::LocalUserJoined
                }
                UpdateSource::Unknown => GroupUpdateRecord::LocalUserJoined,
            }
        } else {
            match self.updater {
                UpdateSource::OtherUser(updater_aci) if updater_aci == new_member => {
                    GroupUpdateRecord::OtherUserJoinedViaInviteLink {
                        user_aci: new_member,
                    }
                }
                _ => {
                    warn!("If user joined via group link, they should be the updater!");
                    GroupUpdateRecord::OtherUserAddedByUnknownUser {
                        user_aci: new_member,
                    }
                }
            }
        };
        self.add(record);
    }

    fn add_user_was_invited(
        &mut self,
        invitee: ServiceId,
        unnamed_invite_counts: &mut UnnamedInviteCounts,
    ) {
        if self.local_identifiers.contains(&invitee) {
            if self.updater == UpdateSource::LocalUser {
                warn!("User invited themselves to the group!");
            }
            let record = self.by_updater(
                GroupUpdateRecord::LocalUserWasInvitedByLocalUser,
                |updater_aci| GroupUpdateRecord::LocalUserWasInvitedByOtherUser { updater_aci },
                GroupUpdateRecord::LocalUserWasInvitedByUnknownUser,
            );
            self.add(record);
        } else if self.updater == UpdateSource::LocalUser {
            self.add(GroupUpdateRecord::OtherUserWasInvitedByLocalUser { invitee });
        } else {
            unnamed_invite_counts.new_invite_count += 1;
        }
    }

    fn add_unnamed_users_were_invited(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        if self.updater == UpdateSource::LocalUser {
            warn!("Unexpected updater - if local user is inviter, should not be unnamed.");
        }
        let record = self.by_updater(
            GroupUpdateRecord::UnnamedUsersWereInvitedByLocalUser { count },
            |updater_aci| GroupUpdateRecord::UnnamedUsersWereInvitedByOtherUser { updater_aci, count },
            GroupUpdateRecord::UnnamedUsersWereInvitedByUnknownUser { count },
        );
        self.add(record);
    }

    fn add_unnamed_user_invites_were_revoked(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        if self.updater == UpdateSource::LocalUser {
            warn!("When local user is updater, should have named invites!");
        }
        let record = self.by_updater(
            GroupUpdateRecord::UnnamedUserInvitesWereRevokedByLocalUser { count },
            |updater_aci| GroupUpdateRecord::UnnamedUserInvitesWereRevokedByOtherUser {
                updater_aci,
                count,
            },
            GroupUpdateRecord::UnnamedUserInvitesWereRevokedByUnknownUser { count },
        );
        self.add(record);
    }

    // Requesting members

    fn add_user_requested_to_join(&mut self, requester_aci: Aci) {
        let record = if self.is_local_aci(&requester_aci) {
            GroupUpdateRecord::LocalUserRequestedToJoin
        } else {
            GroupUpdateRecord::OtherUserRequestedToJoin {
                user_aci: requester_aci,
            }
        };
        self.add(record);
    }

    fn add_user_request_was_approved(&mut self, requester_aci: Aci) {
        let record = if self.is_local_aci(&requester_aci) {
            match self.updater {
                UpdateSource::LocalUser => {
                    // Possible if the group stopped requiring approval while our request was pending.
                    warn!("User added themselves to the group and was updater - should not be possible.");
                    GroupUpdateRecord::LocalUserAddedByLocalUser
                }
                UpdateSource::OtherUser(approver_aci) => {
                    GroupUpdateRecord::LocalUserRequestApproved { approver_aci }
                }
                UpdateSource::Unknown => GroupUpdateRecord::LocalUserRequestApprovedByUnknownUser,
            }
        } else {
            self.by_updater(
                GroupUpdateRecord::OtherUserRequestApprovedByLocalUser {
                    user_aci: requester_aci,
                },
                |approver_aci| GroupUpdateRecord::OtherUserRequestApproved {
                    user_aci: requester_aci,
                    approver_aci,
                },
                GroupUpdateRecord::OtherUserRequestApprovedByUnknownUser {
                    user_aci: requester_aci,
                },
            )
        };
        self.add(record);
    }

    fn add_user_request_was_rejected(&mut self, requester_aci: Aci) {
        let record = if self.is_local_aci(&requester_aci) {
            match self.updater {
                UpdateSource::LocalUser => GroupUpdateRecord::LocalUserRequestCanceledByLocalUser,
                UpdateSource::OtherUser(_) | UpdateSource::Unknown => {
                    GroupUpdateRecord::LocalUserRequestRejectedByUnknownUser
                }
            }
        } else {
            match self.updater {
                UpdateSource::LocalUser => {
                    GroupUpdateRecord::OtherUserRequestRejectedByLocalUser { requester_aci }
                }
                UpdateSource::OtherUser(updater_aci) if updater_aci == requester_aci => {
                    GroupUpdateRecord::OtherUserRequestCanceledByOtherUser { requester_aci }
                }
                UpdateSource::OtherUser(updater_aci) => {
                    GroupUpdateRecord::OtherUserRequestRejectedByOtherUser {
                        updater_aci,
                        requester_aci,
                    }
                }
                UpdateSource::Unknown => {
                    GroupUpdateRecord::OtherUserRequestRejectedByUnknownUser { requester_aci }
                }
            }
        };
        self.add(record);
    }

    // Disappearing messages

    /// Must run after the membership pass: it looks for the local user joining.
    fn add_disappearing_message_updates(
        &mut self,
        old_token: Option<DisappearingMessageToken>,
        new_token: Option<DisappearingMessageToken>,
    ) {
        let local_user_just_joined = self.records.iter().any(GroupUpdateRecord::is_local_user_join);
        if let Some(record) =
            disappearing_message_update_record(self.updater, old_token, new_token, local_user_just_joined)
        {
            self.add(record);
        }
    }

    // Invite links

    fn add_invite_link_updates(&mut self, old_model: &GroupModel, new_model: &GroupModel) {
        if !old_model.is_v2() {
            return;
        }
        if !new_model.is_v2() {
            warn!("Invalid group model: a v2 group turned back into a v1 group.");
            return;
        }

        let old_mode = old_model.invite_link_mode();
        let new_mode = new_model.invite_link_mode();

        if old_mode == new_mode {
            if let (Some(old_password), Some(new_password)) = (
                old_model.invite_link_password.as_ref(),
                new_model.invite_link_password.as_ref(),
            ) {
                if old_password != new_password {
                    let record = self.by_updater(
                        GroupUpdateRecord::InviteLinkResetByLocalUser,
                        |updater_aci| GroupUpdateRecord::InviteLinkResetByOtherUser { updater_aci },
                        GroupUpdateRecord::InviteLinkResetByUnknownUser,
                    );
                    self.add(record);
                }
            }
            return;
        }

        let record = match (old_mode, new_mode) {
            (InviteLinkMode::Disabled, InviteLinkMode::EnabledWithoutApproval) => self.by_updater(
                GroupUpdateRecord::InviteLinkEnabledWithoutApprovalByLocalUser,
                |updater_aci| GroupUpdateRecord::InviteLinkEnabledWithoutApprovalByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::InviteLinkEnabledWithoutApprovalByUnknownUser,
            ),
            (InviteLinkMode::Disabled, InviteLinkMode::EnabledWithApproval) => self.by_updater(
                GroupUpdateRecord::InviteLinkEnabledWithApprovalByLocalUser,
                |updater_aci| GroupUpdateRecord::InviteLinkEnabledWithApprovalByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::InviteLinkEnabledWithApprovalByUnknownUser,
            ),
            (_, InviteLinkMode::Disabled) => self.by_updater(
                GroupUpdateRecord::InviteLinkDisabledByLocalUser,
                |updater_aci| GroupUpdateRecord::InviteLinkDisabledByOtherUser { updater_aci },
                GroupUpdateRecord::InviteLinkDisabledByUnknownUser,
            ),
            (_, InviteLinkMode::EnabledWithoutApproval) => self.by_updater(
                GroupUpdateRecord::InviteLinkApprovalDisabledByLocalUser,
                |updater_aci| GroupUpdateRecord::InviteLinkApprovalDisabledByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::InviteLinkApprovalDisabledByUnknownUser,
            ),
            (_, InviteLinkMode::EnabledWithApproval) => self.by_updater(
                GroupUpdateRecord::InviteLinkApprovalEnabledByLocalUser,
                |updater_aci| GroupUpdateRecord::InviteLinkApprovalEnabledByOtherUser {
                    updater_aci,
                },
                GroupUpdateRecord::InviteLinkApprovalEnabledByUnknownUser,
            ),
        };
        self.add(record);
    }

    // Announcement-only groups

    fn add_announcement_only_updates(&mut self, old_model: &GroupModel, new_model: &GroupModel) {
        if !old_model.is_v2() {
            return;
        }
        if !new_model.is_v2() {
            warn!("Invalid group model: a v2 group turned back into a v1 group.");
            return;
        }
        if old_model.is_announcements_only == new_model.is_announcements_only {
            return;
        }

        let record = if new_model.is_announcements_only {
            self.by_updater(
                GroupUpdateRecord::AnnouncementOnlyEnabledByLocalUser,
                |updater_aci| GroupUpdateRecord::AnnouncementOnlyEnabledByOtherUser { updater_aci },
                GroupUpdateRecord::AnnouncementOnlyEnabledByUnknownUser,
            )
        } else {
            self.by_updater(
                GroupUpdateRecord::AnnouncementOnlyDisabledByLocalUser,
                |updater_aci| GroupUpdateRecord::AnnouncementOnlyDisabledByOtherUser { updater_aci },
                GroupUpdateRecord::AnnouncementOnlyDisabledByUnknownUser,
            )
        };
        self.add(record);
    }

    // Migration

    fn add_migration_updates(&mut self) {
        self.add(GroupUpdateRecord::WasMigrated);
    }
}
