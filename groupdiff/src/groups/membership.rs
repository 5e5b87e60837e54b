// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    address::{Aci, ServiceId},
    LocalIdentifiers,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Normal,
    Administrator,
}

impl Default for MemberRole {
    fn default() -> Self {
        MemberRole::Normal
    }
}

/// Where a single identity stands in one group snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberState {
    Full {
        role: MemberRole,
        did_join_from_invite_link: bool,
        did_join_from_accepted_join_request: bool,
    },
    Invited {
        role: MemberRole,
        added_by: Option<Aci>,
    },
    Requesting,
}

/// Membership of a group at one revision. Each identity has at most one state.
///
/// Full and requesting members are always ACIs; invites may name either kind of service ID.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupMembership {
    members: BTreeMap<ServiceId, MemberState>,
    /// Invites we couldn't decrypt to a user. All we can do is count them.
    invalid_invites: BTreeSet<Vec<u8>>,
}

impl GroupMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_member(mut self, aci: Aci, role: MemberRole) -> Self {
        self.insert_full_member(aci, role, false, false);
        self
    }

    pub fn with_full_member_via_invite_link(mut self, aci: Aci, role: MemberRole) -> Self {
        self.insert_full_member(aci, role, true, false);
        self
    }

    pub fn with_full_member_via_join_request(mut self, aci: Aci, role: MemberRole) -> Self {
        self.insert_full_member(aci, role, false, true);
        self
    }

    pub fn with_invited_member(
        mut self,
        invitee: impl Into<ServiceId>,
        role: MemberRole,
        added_by: Option<Aci>,
    ) -> Self {
        self.members
            .insert(invitee.into(), MemberState::Invited { role, added_by });
        self
    }

    pub fn with_requesting_member(mut self, aci: Aci) -> Self {
        self.members
            .insert(ServiceId::Aci(aci), MemberState::Requesting);
        self
    }

    pub fn with_invalid_invite(mut self, user_id: Vec<u8>) -> Self {
        self.invalid_invites.insert(user_id);
        self
    }

    pub fn insert_full_member(
        &mut self,
        aci: Aci,
        role: MemberRole,
        did_join_from_invite_link: bool,
        did_join_from_accepted_join_request: bool,
    ) {
        self.members.insert(
            ServiceId::Aci(aci),
            MemberState::Full {
                role,
                did_join_from_invite_link,
                did_join_from_accepted_join_request,
            },
        );
    }

    /// Callers are expected to have checked that full and requesting states only go to ACIs.
    pub(crate) fn insert(&mut self, service_id: ServiceId, state: MemberState) -> Option<MemberState> {
        self.members.insert(service_id, state)
    }

    pub(crate) fn insert_invalid_invite(&mut self, user_id: Vec<u8>) {
        self.invalid_invites.insert(user_id);
    }

    pub fn state(&self, service_id: &ServiceId) -> Option<&MemberState> {
        self.members.get(service_id)
    }

    pub fn members(&self) -> impl Iterator<Item = (&ServiceId, &MemberState)> {
        self.members.iter()
    }

    pub fn all_members_of_any_kind(&self) -> impl Iterator<Item = &ServiceId> {
        self.members.keys()
    }

    pub fn invalid_invite_user_ids(&self) -> &BTreeSet<Vec<u8>> {
        &self.invalid_invites
    }

    pub fn is_full_member(&self, service_id: &ServiceId) -> bool {
        matches!(self.state(service_id), Some(MemberState::Full { .. }))
    }

    pub fn is_invited_member(&self, service_id: &ServiceId) -> bool {
        matches!(self.state(service_id), Some(MemberState::Invited { .. }))
    }

    pub fn is_requesting_member(&self, service_id: &ServiceId) -> bool {
        matches!(self.state(service_id), Some(MemberState::Requesting))
    }

    pub fn is_full_member_and_administrator(&self, aci: &Aci) -> bool {
        matches!(
            self.state(&ServiceId::Aci(*aci)),
            Some(MemberState::Full {
                role: MemberRole::Administrator,
                ..
            })
        )
    }

    /// Who sent the invite for this pending member, if they're pending and we know.
    pub fn added_by_aci(&self, invitee: &ServiceId) -> Option<Aci> {
        match self.state(invitee) {
            Some(MemberState::Invited { added_by, .. }) => *added_by,
            _ => None,
        }
    }

    pub fn did_join_from_invite_link(&self, aci: &Aci) -> bool {
        matches!(
            self.state(&ServiceId::Aci(*aci)),
            Some(MemberState::Full {
                did_join_from_invite_link: true,
                ..
            })
        )
    }

    pub fn did_join_from_accepted_join_request(&self, aci: &Aci) -> bool {
        matches!(
            self.state(&ServiceId::Aci(*aci)),
            Some(MemberState::Full {
                did_join_from_accepted_join_request: true,
                ..
            })
        )
    }
}

/// Condensed status of one identity, which is what membership diffs compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipStatus {
    NormalMember { aci: Aci, role: MemberRole },
    Invited {
        invitee: ServiceId,
        role: MemberRole,
        invited_by: Option<Aci>,
    },
    Requesting { aci: Aci },
    NotMember,
}

impl MembershipStatus {
    pub fn of(service_id: &ServiceId, membership: &GroupMembership) -> Self {
        match (membership.state(service_id), service_id) {
            (Some(MemberState::Full { role, .. }), ServiceId::Aci(aci)) => {
                MembershipStatus::NormalMember {
                    aci: *aci,
                    role: *role,
                }
            }
            (Some(MemberState::Invited { role, added_by }), _) => MembershipStatus::Invited {
                invitee: *service_id,
                role: *role,
                invited_by: *added_by,
            },
            (Some(MemberState::Requesting), ServiceId::Aci(aci)) => {
                MembershipStatus::Requesting { aci: *aci }
            }
            (Some(_), ServiceId::Pni(_)) => {
                log::warn!("Ignoring a full or requesting group member listed under a PNI.");
                MembershipStatus::NotMember
            }
            (None, _) => MembershipStatus::NotMember,
        }
    }

    /// Status of the local user, preferring their ACI and falling back to their PNI.
    pub fn local(local_identifiers: &LocalIdentifiers, membership: &GroupMembership) -> Self {
        match Self::of(&local_identifiers.aci_service_id(), membership) {
            MembershipStatus::NotMember => local_identifiers
                .pni_service_id()
                .map(|pni| Self::of(&pni, membership))
                .unwrap_or(MembershipStatus::NotMember),
            status => status,
        }
    }

    pub fn is_member(&self) -> bool {
        !matches!(self, MembershipStatus::NotMember)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Pni;
    use uuid::Uuid;

    #[test]
    fn classify_members() {
        let alice = Aci::from_uuid(Uuid::new_v4());
        let bob = Aci::from_uuid(Uuid::new_v4());
        let carol_pni = Pni::from_uuid(Uuid::new_v4());
        let dave = Aci::from_uuid(Uuid::new_v4());

        let membership = GroupMembership::new()
            .with_full_member(alice, MemberRole::Administrator)
            .with_requesting_member(bob)
            .with_invited_member(carol_pni, MemberRole::Normal, Some(alice));

        assert_eq!(
            MembershipStatus::of(&alice.into(), &membership),
            MembershipStatus::NormalMember {
                aci: alice,
                role: MemberRole::Administrator
            }
        );
        assert_eq!(
            MembershipStatus::of(&bob.into(), &membership),
            MembershipStatus::Requesting { aci: bob }
        );
        assert_eq!(
            MembershipStatus::of(&carol_pni.into(), &membership),
            MembershipStatus::Invited {
                invitee: carol_pni.into(),
                role: MemberRole::Normal,
                invited_by: Some(alice)
            }
        );
        assert_eq!(
            MembershipStatus::of(&dave.into(), &membership),
            MembershipStatus::NotMember
        );
        assert_eq!(membership.added_by_aci(&carol_pni.into()), Some(alice));
        assert!(membership.is_full_member_and_administrator(&alice));
    }

    #[test]
    fn local_status_falls_back_to_pni() {
        let local = LocalIdentifiers::new(
            Aci::from_uuid(Uuid::new_v4()),
            Some(Pni::from_uuid(Uuid::new_v4())),
            None,
        );
        let inviter = Aci::from_uuid(Uuid::new_v4());

        let invited_by_pni = GroupMembership::new()
            .with_full_member(inviter, MemberRole::Administrator)
            .with_invited_member(local.pni.unwrap(), MemberRole::Normal, Some(inviter));
        assert!(matches!(
            MembershipStatus::local(&local, &invited_by_pni),
            MembershipStatus::Invited {
                invited_by: Some(_),
                ..
            }
        ));

        // The ACI wins when both are present.
        let both = invited_by_pni.with_full_member(local.aci, MemberRole::Normal);
        assert!(matches!(
            MembershipStatus::local(&local, &both),
            MembershipStatus::NormalMember { .. }
        ));
    }
}
