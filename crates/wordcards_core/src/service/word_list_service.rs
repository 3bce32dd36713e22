//! Word list use-case service.
//!
//! # Invariants
//! - Every call is scoped to the acting user; a list owned by someone else is
//!   reported exactly like a list that does not exist.

use crate::error::{CoreError, CoreResult};
use crate::model::ids::{ListId, UserId};
use crate::model::word_list::{WordList, WordListDetail, WordListDraft};
use crate::ownership::EntityRef;
use crate::repo::word_list_repo::WordListRepository;
use log::info;

pub struct WordListService<R: WordListRepository> {
    repo: R,
}

impl<R: WordListRepository> WordListService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a list; the caller becomes its owner.
    pub fn create(&mut self, owner: UserId, draft: WordListDraft) -> CoreResult<WordList> {
        draft.validate()?;
        let list = self.repo.create_word_list(owner, &draft)?;
        info!(
            "event=word_list_create module=word_list status=ok user_id={owner} list_id={}",
            list.id
        );
        Ok(list)
    }

    /// Snapshot of the caller's lists, newest first.
    pub fn list_by_owner(&self, owner: UserId) -> CoreResult<Vec<WordList>> {
        Ok(self.repo.list_word_lists(owner)?)
    }

    /// Gets one list with its cards, oldest card first.
    pub fn get_with_cards(&mut self, owner: UserId, list_id: ListId) -> CoreResult<WordListDetail> {
        self.repo
            .get_word_list_with_cards(owner, list_id)?
            .ok_or(CoreError::NotFound(EntityRef::WordList(list_id)))
    }

    pub fn update(
        &mut self,
        owner: UserId,
        list_id: ListId,
        draft: WordListDraft,
    ) -> CoreResult<WordList> {
        draft.validate()?;
        let list = self.repo.update_word_list(owner, list_id, &draft)?;
        info!(
            "event=word_list_update module=word_list status=ok user_id={owner} list_id={list_id}"
        );
        Ok(list)
    }

    /// Deletes a list and, through the storage cascade, its cards.
    pub fn delete(&mut self, owner: UserId, list_id: ListId) -> CoreResult<()> {
        self.repo.delete_word_list(owner, list_id)?;
        info!(
            "event=word_list_delete module=word_list status=ok user_id={owner} list_id={list_id}"
        );
        Ok(())
    }
}
