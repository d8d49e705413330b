//! Navigate, rename and delete inside the logistics module while host
//! hooks watch the store

use dms_console::{Activation, Console, ConsoleConfig, ConsoleError, ConsoleSeed, Reconciliation};
use dms_store::{Revision, Role, TreeObserver};
use dms_test_utils::{folder, logistics_seed, ChangeLog, FixedClock};
use dms_tree::{Forest, NodeId};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;

mock! {
    Observer {}
    impl TreeObserver for Observer {
        fn tree_changed(&mut self, key: &str, forest: &Forest, revision: Revision);
    }
}

fn console() -> Console {
    let seed = ConsoleSeed {
        document: logistics_seed(),
        publications: Vec::new(),
    };
    Console::new(seed, ConsoleConfig::new().with_user("Joana Matos", Role::SubManager))
        .with_clock(Arc::new(FixedClock::default()))
}

fn names(forest: &Forest) -> Vec<(String, String)> {
    forest
        .iter()
        .map(|node| (node.id().to_string(), node.name().to_string()))
        .collect()
}

#[test]
fn rename_then_delete_inside_folder() {
    let mut console = console();
    let log = ChangeLog::default();
    console.subscribe(Box::new(log.clone()));

    let mut session = console.open_view("/logistica-docs").unwrap();
    let entered = session.activate(console.store(), &NodeId::from("1")).unwrap();
    assert_eq!(entered, Activation::Entered);

    let file = NodeId::from("2");
    session.rename(console.store_mut(), &file, "Invoice.pdf").unwrap();
    assert_eq!(
        names(&session.contents(console.store())),
        vec![("2".to_string(), "Invoice.pdf".to_string())]
    );
    let renamed = &session.contents(console.store())[0];
    assert_eq!(renamed.stamp().by, "Joana Matos");
    assert_eq!(renamed.stamp().at, FixedClock::default().0);

    session.delete(console.store_mut(), &file).unwrap();
    assert!(session.contents(console.store()).is_empty());
    assert_eq!(
        session.navigator().breadcrumb_trail().collect::<Vec<_>>(),
        vec!["FolderA"]
    );
    assert_eq!(
        session.breadcrumbs(console.store()),
        vec!["Logistics Documents", "FolderA"]
    );

    let revisions: Vec<u64> = log.entries().iter().map(|c| c.revision.value()).collect();
    assert_eq!(revisions, vec![1, 2]);
    assert!(log.entries().iter().all(|c| c.key == "/logistica-docs"));
}

#[test]
fn deleting_the_open_folder_from_elsewhere_moves_up() {
    let mut console = console();
    let mut inside = console.open_view("/logistica-docs").unwrap();
    let mut outside = console.open_view("/logistica-docs").unwrap();

    inside.activate(console.store(), &NodeId::from("1")).unwrap();
    outside.delete(console.store_mut(), &NodeId::from("1")).unwrap();

    assert_eq!(inside.breadcrumbs(console.store()), vec!["Logistics Documents"]);

    assert!(inside.navigator().is_root());
    assert!(inside.contents(console.store()).is_empty());
}

#[test]
fn stale_edit_is_silent_and_never_notifies() {
    let mut console = console();
    let mut observer = MockObserver::new();
    observer.expect_tree_changed().times(1).returning(|_, _, _| ());
    console.subscribe(Box::new(observer));

    let mut session = console.open_view("/logistica-docs").unwrap();
    let mut other = console.open_view("/logistica-docs").unwrap();
    other.delete(console.store_mut(), &NodeId::from("1")).unwrap();

    // session still believes FolderA is at the root
    let err = session
        .rename(console.store_mut(), &NodeId::from("1"), "FolderB")
        .unwrap_err();
    assert!(err.is_silent());
    assert_eq!(console.store().revision("/logistica-docs"), Some(Revision::new(1)));
}

#[test]
fn blank_folder_name_is_rejected_before_the_store() {
    let mut console = console();
    let mut session = console.open_view("/logistica-docs").unwrap();

    let err = session.create_folder(console.store_mut(), "   ").unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidInput(_)));
    assert!(!err.is_silent());
    assert_eq!(console.store().revision("/logistica-docs"), Some(Revision::new(0)));
}

#[test]
fn recreated_tree_resets_open_sessions() {
    let mut console = console();
    let mut session = console.open_view("/logistica-docs").unwrap();
    session.activate(console.store(), &NodeId::from("1")).unwrap();

    console.store_mut().remove("/logistica-docs");
    console
        .store_mut()
        .set("/logistica-docs", Forest::unit(folder("9", "Other", vec![])));
    assert_eq!(console.store().revision("/logistica-docs"), Some(Revision::new(1)));

    assert_eq!(
        session.sync(console.store()),
        Reconciliation::Truncated { from: 1, to: 0 }
    );
    assert_eq!(session.breadcrumbs(console.store()), vec!["Logistics Documents"]);
    assert_eq!(names(&session.contents(console.store())), vec![("9".to_string(), "Other".to_string())]);
}
