// Copyright (c) 2022 MobileCoin Inc.
// Copyright (c) 2022 Emily Cultip

use log::{debug, error};

use crate::{
    address::UpdaterAddress,
    state::{ContactsManager, RecipientStore},
    LocalIdentifiers,
};

use super::{
    diff::DiffingGroupUpdateRecordBuilder,
    new_group::new_group_update_records,
    translate::RecordTranslator,
    update_item::GroupUpdateItem,
    update_record::GroupUpdateRecord,
    update_source::{GroupUpdateSource, UpdateSource},
    DisappearingMessageToken, GroupModel,
};

/// Generic record standing in for a change we couldn't describe any better.
pub fn generic_update_record(source: &GroupUpdateSource) -> GroupUpdateRecord {
    match source.attribution() {
        UpdateSource::LocalUser => GroupUpdateRecord::GenericUpdateByLocalUser,
        UpdateSource::OtherUser(updater_aci) => GroupUpdateRecord::GenericUpdateByOtherUser { updater_aci },
        UpdateSource::Unknown => GroupUpdateRecord::GenericUpdateByUnknownUser,
    }
}

/// Produces update items for a group, resolving actors and names through the given collaborators.
///
/// Every entry point returns at least one item.
pub struct GroupUpdateItemBuilder<'a, C: ContactsManager, R: RecipientStore> {
    contacts: &'a C,
    recipients: &'a R,
}

impl<'a, C: ContactsManager, R: RecipientStore> GroupUpdateItemBuilder<'a, C, R> {
    pub fn new(contacts: &'a C, recipients: &'a R) -> Self {
        Self { contacts, recipients }
    }

    pub fn resolve_source(
        &self,
        hint: Option<&UpdaterAddress>,
        known_local: bool,
        local_identifiers: &LocalIdentifiers,
    ) -> GroupUpdateSource {
        GroupUpdateSource::resolve(hint, known_local, local_identifiers, self.recipients)
    }

    /// Diff two snapshots into records ready to be persisted.
    #[allow(clippy::too_many_arguments)]
    pub fn records_by_models(
        &self,
        old_model: &GroupModel,
        new_model: &GroupModel,
        old_token: Option<DisappearingMessageToken>,
        new_token: Option<DisappearingMessageToken>,
        hint: Option<&UpdaterAddress>,
        known_local: bool,
        local_only: bool,
    ) -> Vec<GroupUpdateRecord> {
        let local_identifiers = self.recipients.local_identifiers();
        let source = self.resolve_source(hint, known_local, &local_identifiers);
        debug!(
            "Diffing group {} from revision {} to {}, updated by {:?}",
            new_model.group_id.to_base64(),
            old_model.revision,
            new_model.revision,
            source
        );

        let records = DiffingGroupUpdateRecordBuilder::new(&source, &local_identifiers, local_only)
            .build(old_model, new_model, old_token, new_token);
        Self::guard_empty(records, &source)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn diff_by_models(
        &self,
        old_model: &GroupModel,
        new_model: &GroupModel,
        old_token: Option<DisappearingMessageToken>,
        new_token: Option<DisappearingMessageToken>,
        hint: Option<&UpdaterAddress>,
        known_local: bool,
        local_only: bool,
    ) -> Vec<GroupUpdateItem> {
        let records = self.records_by_models(
            old_model,
            new_model,
            old_token,
            new_token,
            hint,
            known_local,
            local_only,
        );
        self.translate_precomputed(&records, &self.recipients.local_identifiers())
    }

    /// Records for the first snapshot we have of a group.
    pub fn records_for_new_group(
        &self,
        new_model: &GroupModel,
        new_token: Option<DisappearingMessageToken>,
        hint: Option<&UpdaterAddress>,
        known_local: bool,
    ) -> Vec<GroupUpdateRecord> {
        let local_identifiers = self.recipients.local_identifiers();
        let source = self.resolve_source(hint, known_local, &local_identifiers);
        let records = new_group_update_records(new_model, new_token, &source, &local_identifiers);
        Self::guard_empty(records, &source)
    }

    pub fn diff_for_new_group(
        &self,
        new_model: &GroupModel,
        new_token: Option<DisappearingMessageToken>,
        hint: Option<&UpdaterAddress>,
        known_local: bool,
    ) -> Vec<GroupUpdateItem> {
        let records = self.records_for_new_group(new_model, new_token, hint, known_local);
        self.translate_precomputed(&records, &self.recipients.local_identifiers())
    }

    /// Expand stored records, using whatever names our contacts have now.
    pub fn translate_precomputed(
        &self,
        records: &[GroupUpdateRecord],
        local_identifiers: &LocalIdentifiers,
    ) -> Vec<GroupUpdateItem> {
        let translator = RecordTranslator::new(self.contacts, local_identifiers);
        let items = translator.translate_all(records);
        if items.is_empty() {
            error!("Asked to translate an empty list of group update records.");
            return vec![GroupUpdateItem::GenericUpdateByUnknownUser];
        }
        items
    }

    /// The one item to show when there's nothing to diff.
    pub fn default_item(&self, hint: Option<&UpdaterAddress>, known_local: bool) -> GroupUpdateItem {
        let local_identifiers = self.recipients.local_identifiers();
        let source = self.resolve_source(hint, known_local, &local_identifiers);
        RecordTranslator::new(self.contacts, &local_identifiers).translate(&generic_update_record(&source))
    }

    fn guard_empty(records: Vec<GroupUpdateRecord>, source: &GroupUpdateSource) -> Vec<GroupUpdateRecord> {
        if records.is_empty() {
            error!("Group update produced no items, falling back to a generic update.");
            return vec![generic_update_record(source)];
        }
        records
    }
}
