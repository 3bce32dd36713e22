use rusqlite::Connection;
use wordcards_core::db::open_db_in_memory;
use wordcards_core::{
    CardDraft, CardService, CoreError, EntityRef, ListId, NewUser, SqliteCardRepository,
    SqliteUserRepository, SqliteWordListRepository, UserId, UserRepository, ValidationError,
    WordListDraft, WordListService,
};

fn seed_user(conn: &Connection, name: &str) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    let user = repo
        .create_user(
            &NewUser::new(name, format!("{name}@example.com"), "pw"),
            "hash",
        )
        .unwrap();
    user.id
}

fn create_list(conn: &mut Connection, owner: UserId, title: &str) -> ListId {
    let repo = SqliteWordListRepository::try_new(conn).unwrap();
    WordListService::new(repo)
        .create(owner, WordListDraft::new(title, None))
        .unwrap()
        .id
}

#[test]
fn created_list_is_owned_by_creator() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let mut service = WordListService::new(repo);
    let list = service
        .create(
            alice,
            WordListDraft::new("Spanish", Some("basics".to_string())),
        )
        .unwrap();

    assert_eq!(list.user_id, alice);
    assert_eq!(list.title, "Spanish");
    assert_eq!(list.description.as_deref(), Some("basics"));
    assert!(list.created_at > 0);
}

#[test]
fn blank_title_is_rejected_before_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let mut service = WordListService::new(repo);
    let err = service
        .create(alice, WordListDraft::new("   ", None))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::TitleRequired)
    ));
    assert!(service.list_by_owner(alice).unwrap().is_empty());
}

#[test]
fn listing_returns_only_own_lists_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");

    let first = create_list(&mut conn, alice, "first");
    let second = create_list(&mut conn, alice, "second");
    create_list(&mut conn, bob, "bob's");

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let service = WordListService::new(repo);
    let ids: Vec<ListId> = service
        .list_by_owner(alice)
        .unwrap()
        .into_iter()
        .map(|list| list.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(service.list_by_owner(bob).unwrap().len(), 1);
}

#[test]
fn foreign_list_is_reported_as_not_found_for_every_operation() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    let list_id = create_list(&mut conn, alice, "Spanish");

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let mut service = WordListService::new(repo);

    let get_err = service.get_with_cards(bob, list_id).unwrap_err();
    assert!(matches!(get_err, CoreError::NotFound(EntityRef::WordList(id)) if id == list_id));

    let update_err = service
        .update(bob, list_id, WordListDraft::new("stolen", None))
        .unwrap_err();
    assert!(matches!(update_err, CoreError::NotFound(_)));

    let delete_err = service.delete(bob, list_id).unwrap_err();
    assert!(matches!(delete_err, CoreError::NotFound(_)));

    let detail = service.get_with_cards(alice, list_id).unwrap();
    assert_eq!(detail.list.title, "Spanish");
}

#[test]
fn update_replaces_title_and_clears_blank_description() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let mut service = WordListService::new(repo);
    let list = service
        .create(alice, WordListDraft::new("Old", Some("desc".to_string())))
        .unwrap();

    let updated = service
        .update(alice, list.id, WordListDraft::new("New", Some("  ".to_string())))
        .unwrap();
    assert_eq!(updated.id, list.id);
    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, None);
    assert!(updated.updated_at >= list.updated_at);
}

#[test]
fn detail_includes_cards_in_creation_order() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let list_id = create_list(&mut conn, alice, "Spanish");

    {
        let repo = SqliteCardRepository::try_new(&mut conn).unwrap();
        let mut cards = CardService::new(repo);
        cards
            .create(
                alice,
                list_id,
                CardDraft::new("hola", Some("¡Hola, amigo!".to_string()), "hello"),
            )
            .unwrap();
        cards
            .create(alice, list_id, CardDraft::new("adiós", None, "goodbye"))
            .unwrap();
    }

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let mut service = WordListService::new(repo);
    let detail = service.get_with_cards(alice, list_id).unwrap();
    assert_eq!(detail.cards.len(), 2);

    let first = &detail.cards[0];
    assert_eq!(first.front, "hola");
    assert_eq!(first.back, "hello");
    assert_eq!(first.front_example.as_deref(), Some("¡Hola, amigo!"));
    assert_eq!(first.list_id, list_id);

    let second = &detail.cards[1];
    assert_eq!(second.front, "adiós");
    assert_eq!(second.back, "goodbye");
    assert_eq!(second.front_example, None);
}

#[test]
fn deleted_list_is_gone_with_its_cards() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let list_id = create_list(&mut conn, alice, "Spanish");

    {
        let repo = SqliteCardRepository::try_new(&mut conn).unwrap();
        CardService::new(repo)
            .create(alice, list_id, CardDraft::new("hola", None, "hello"))
            .unwrap();
    }

    {
        let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
        let mut service = WordListService::new(repo);
        service.delete(alice, list_id).unwrap();

        let err = service.get_with_cards(alice, list_id).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(EntityRef::WordList(_))));

        let err = service.delete(alice, list_id).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(EntityRef::WordList(_))));
    }

    let orphaned: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM cards WHERE list_id = ?1;",
            [list_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[test]
fn creating_list_for_unknown_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();

    let repo = SqliteWordListRepository::try_new(&mut conn).unwrap();
    let err = WordListService::new(repo)
        .create(UserId(99), WordListDraft::new("ghost", None))
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityRef::User(UserId(99)))));
}
