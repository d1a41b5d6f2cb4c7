use memo_core::db::open_db_in_memory;
use memo_core::{
    FindMemoRelation, MemoRelationType, MemoRepository, MemoService, MemoServiceError, NewUser,
    Role, SqliteMemoRepository, SqliteUserRepository, User, UserRepository, Visibility,
};
use rusqlite::Connection;

fn seed_user(conn: &Connection, username: &str) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(&NewUser::new(username, Role::User))
        .unwrap()
}

#[test]
fn comment_is_private_and_linked_regardless_of_parent_visibility() {
    let conn = open_db_in_memory().unwrap();
    let author = seed_user(&conn, "author");
    let reader = seed_user(&conn, "reader");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());

    for visibility in [Visibility::Private, Visibility::Protected, Visibility::Public] {
        let parent = service.create_memo(&author, "parent", visibility).unwrap();
        let comment = service.create_comment(&parent, &reader, "reply").unwrap();

        assert_eq!(comment.visibility, Visibility::Private);
        assert_eq!(comment.parent_id, Some(parent.id));
        assert_eq!(comment.creator_id, reader.id);
        assert_eq!(comment.content, "reply");
        assert!(comment.is_comment());
    }
}

#[test]
fn each_comment_has_exactly_one_comment_relation() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();
    let service = MemoService::new(repo);
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();
    let comment = service.create_comment(&parent, &user, "c").unwrap();

    let relations = repo
        .list_memo_relations(&FindMemoRelation {
            memo_id: Some(comment.id),
            kind: Some(MemoRelationType::Comment),
            ..FindMemoRelation::default()
        })
        .unwrap();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].related_memo_id, parent.id);
}

#[test]
fn identical_comments_are_not_deduplicated() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();

    let first = service.create_comment(&parent, &user, "same").unwrap();
    let second = service.create_comment(&parent, &user, "same").unwrap();
    assert_ne!(first.id, second.id);
    assert_ne!(first.uid, second.uid);
    assert_eq!(service.list_comments(&parent).unwrap().len(), 2);
}

#[test]
fn empty_content_is_stored_as_given() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();

    let comment = service.create_comment(&parent, &user, "").unwrap();
    assert_eq!(comment.content, "");
}

#[test]
fn list_comments_preserves_insertion_order_and_scope() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();
    let other = service.create_memo(&user, "o", Visibility::Public).unwrap();

    service.create_comment(&parent, &user, "one").unwrap();
    service.create_comment(&other, &user, "elsewhere").unwrap();
    service.create_comment(&parent, &user, "two").unwrap();
    service.create_comment(&parent, &user, "three").unwrap();

    let contents: Vec<String> = service
        .list_comments(&parent)
        .unwrap()
        .into_iter()
        .map(|memo| memo.content)
        .collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[test]
fn list_comments_on_memo_without_comments_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();

    assert!(service.list_comments(&parent).unwrap().is_empty());
}

#[test]
fn list_comments_skips_dangling_relation() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "u");
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());
    let parent = service.create_memo(&user, "p", Visibility::Public).unwrap();
    let doomed = service.create_comment(&parent, &user, "doomed").unwrap();
    let kept = service.create_comment(&parent, &user, "kept").unwrap();

    service.delete_memo(doomed.id).unwrap();

    let comments = service.list_comments(&parent).unwrap();
    assert_eq!(comments, vec![kept]);
}

#[test]
fn require_memo_reports_missing_uid() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());

    let err = service.require_memo("ghost").unwrap_err();
    assert!(matches!(err, MemoServiceError::MemoNotFound(uid) if uid == "ghost"));
}
