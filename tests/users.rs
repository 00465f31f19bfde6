use anyhow::anyhow;

use hedonic::users::{
    Change, InMemoryBackend, NewUser, StorageBackend, UserStore, UserStoreError,
};

// bcrypt cost 4 keeps the hashing fast in tests
fn store() -> UserStore<InMemoryBackend> {
    UserStore::new(InMemoryBackend).with_hash_cost(4)
}

fn jane() -> NewUser {
    NewUser {
        user_name: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

/// Backend that vetoes every commit.
struct FailingBackend;

impl StorageBackend for FailingBackend {
    fn commit(&mut self, _change: &Change) -> anyhow::Result<()> {
        Err(anyhow!("disk full"))
    }
}

#[test]
fn add_assigns_sequential_ids_and_hashes_the_password() {
    let mut store = store();
    let id = store.add(jane()).unwrap();
    assert_eq!(id, 1);

    let other = store
        .add(NewUser {
            user_name: "joe".to_string(),
            email: "joe@example.com".to_string(),
            password: "swordfish".to_string(),
        })
        .unwrap();
    assert_eq!(other, 2);
    assert_eq!(store.len(), 2);

    let user = store.get(id).unwrap();
    assert_eq!(user.user_name, "jane");
    assert_eq!(user.email, "jane@example.com");
    // never the plaintext
    assert_ne!(user.password_hash(), "hunter2");
    assert!(store.verify_password(id, "hunter2").unwrap());
    assert!(!store.verify_password(id, "wrong").unwrap());
}

#[test]
fn duplicate_user_name_and_email_are_rejected() {
    let mut store = store();
    store.add(jane()).unwrap();

    let same_name = NewUser {
        user_name: "jane".to_string(),
        email: "other@example.com".to_string(),
        password: "pw".to_string(),
    };
    assert!(matches!(
        store.add(same_name),
        Err(UserStoreError::DuplicateUserName(_))
    ));

    let same_email = NewUser {
        user_name: "other".to_string(),
        email: "jane@example.com".to_string(),
        password: "pw".to_string(),
    };
    assert!(matches!(
        store.add(same_email),
        Err(UserStoreError::DuplicateEmail(_))
    ));
    assert_eq!(store.len(), 1);
}

#[test]
fn a_vetoed_insert_is_rolled_back_with_a_reason() {
    let mut store = UserStore::new(FailingBackend).with_hash_cost(4);
    let err = store.add(jane()).unwrap_err();

    match err {
        UserStoreError::Storage(reason) => assert!(reason.contains("disk full")),
        other => panic!("expected a storage error, got {}", other),
    }
    // nothing was inserted
    assert!(store.is_empty());
    assert!(store.find_by_user_name("jane").is_none());
}

#[test]
fn update_password_rehashes_and_commits() {
    let mut store = store();
    let id = store.add(jane()).unwrap();
    let old_hash = store.get(id).unwrap().password_hash().to_string();

    store.update_password(id, "correct horse").unwrap();
    assert_ne!(store.get(id).unwrap().password_hash(), old_hash);
    assert!(store.verify_password(id, "correct horse").unwrap());
    assert!(!store.verify_password(id, "hunter2").unwrap());

    assert!(matches!(
        store.update_password(99, "pw"),
        Err(UserStoreError::NotFound(99))
    ));
}

#[test]
fn delete_removes_the_record() {
    let mut store = store();
    let id = store.add(jane()).unwrap();

    store.delete(id).unwrap();
    assert!(store.get(id).is_none());
    assert!(matches!(store.delete(id), Err(UserStoreError::NotFound(_))));
}

#[test]
fn find_by_user_name_matches_exactly() {
    let mut store = store();
    let id = store.add(jane()).unwrap();

    assert_eq!(store.find_by_user_name("jane").unwrap().id, id);
    assert!(store.find_by_user_name("Jane").is_none());
}

#[test]
fn display_never_leaks_credentials() {
    let mut store = store();
    let id = store.add(jane()).unwrap();
    let shown = format!("{}", store.get(id).unwrap());
    assert_eq!(shown, format!("User(id={})", id));
}
