//! Card and quiz-attempt use-case services.
//!
//! # Responsibility
//! - Validate card input, then delegate to repositories that run the
//!   ownership check and the write in one transaction.
//! - Log denied access with the precise resolver outcome while returning a
//!   single `Authorization` error to callers.

use crate::error::{CoreError, CoreResult};
use crate::model::card::{Card, CardDraft};
use crate::model::ids::{CardId, ListId, UserId};
use crate::model::quiz::QuizAttempt;
use crate::repo::card_repo::CardRepository;
use crate::repo::quiz_repo::QuizRepository;
use crate::repo::RepoError;
use log::{info, warn};

pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create(&mut self, owner: UserId, list_id: ListId, draft: CardDraft) -> CoreResult<Card> {
        draft.validate()?;
        let card = self
            .repo
            .create_card(owner, list_id, &draft)
            .map_err(|err| denied("card_create", owner, err))?;
        info!(
            "event=card_create module=card status=ok user_id={owner} list_id={list_id} card_id={}",
            card.id
        );
        Ok(card)
    }

    pub fn update(&mut self, owner: UserId, card_id: CardId, draft: CardDraft) -> CoreResult<Card> {
        draft.validate()?;
        let card = self
            .repo
            .update_card(owner, card_id, &draft)
            .map_err(|err| denied("card_update", owner, err))?;
        info!("event=card_update module=card status=ok user_id={owner} card_id={card_id}");
        Ok(card)
    }

    pub fn delete(&mut self, owner: UserId, card_id: CardId) -> CoreResult<()> {
        self.repo
            .delete_card(owner, card_id)
            .map_err(|err| denied("card_delete", owner, err))?;
        info!("event=card_delete module=card status=ok user_id={owner} card_id={card_id}");
        Ok(())
    }
}

pub struct QuizService<R: QuizRepository> {
    repo: R,
}

impl<R: QuizRepository> QuizService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends one review attempt for a card the caller owns.
    pub fn record(
        &mut self,
        owner: UserId,
        card_id: CardId,
        correct: bool,
    ) -> CoreResult<QuizAttempt> {
        let attempt = self
            .repo
            .record_attempt(owner, card_id, correct)
            .map_err(|err| denied("quiz_record", owner, err))?;
        info!(
            "event=quiz_record module=quiz status=ok user_id={owner} card_id={card_id} \
             correct={correct}"
        );
        Ok(attempt)
    }
}

fn denied(event: &'static str, owner: UserId, err: RepoError) -> CoreError {
    if let RepoError::Denied { entity, ownership } = &err {
        warn!(
            "event={event} module=card status=denied user_id={owner} target={entity} outcome={}",
            ownership.as_str()
        );
    }
    CoreError::from(err)
}
