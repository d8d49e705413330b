//! Console state written to disk and read back through a config file

use dms_console::{Console, ConsoleConfig, ConsoleSeed};
use dms_store::Role;
use dms_test_utils::FixedClock;
use dms_tree::{query, NodeId, NodeKind, TreeFingerprint, UnknownExtensionPolicy};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn edits_survive_export_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("state.yaml");
    let config_path = dir.path().join("dms.toml");

    let mut console = Console::new(ConsoleSeed::demo().unwrap(), ConsoleConfig::default())
        .with_clock(Arc::new(FixedClock::default()));
    let mut session = console.open_view("/projects-e-engineering/active").unwrap();
    let folder = session.create_folder(console.store_mut(), "Bridge Retrofit").unwrap();
    session.activate(console.store(), &folder).unwrap();
    let upload = session
        .upload_file(console.store_mut(), "Survey.pdf", Some("2.4 MB".into()))
        .unwrap();
    console.request_publish(&mut session, &upload).unwrap();
    console.export().save(&seed_path).unwrap();

    std::fs::write(
        &config_path,
        format!(
            "user_name = \"Rui Costa\"\nrole = \"sub_manager\"\nseed_path = {:?}\n",
            seed_path.display().to_string()
        ),
    )
    .unwrap();
    let config = ConsoleConfig::load(&config_path).unwrap();
    let seed = ConsoleSeed::load(config.seed_path.as_deref().unwrap()).unwrap();
    let reloaded = Console::new(seed, config);

    assert_eq!(reloaded.export(), console.export());
    for key in console.store().keys() {
        assert_eq!(
            TreeFingerprint::compute(&reloaded.store().get(key)).unwrap(),
            TreeFingerprint::compute(&console.store().get(key)).unwrap()
        );
    }
    assert_eq!(reloaded.user().role, Role::SubManager);

    let tree = reloaded.store().get("/projects-e-engineering/active");
    let survey = query::find(&tree, &upload).unwrap();
    assert_eq!(survey.kind(), NodeKind::Pdf);
    assert_eq!(survey.size(), Some("2.4 MB"));
    assert_eq!(reloaded.publications().records()[0].id, upload);
}

#[test]
fn unknown_extensions_follow_the_configured_policy() {
    let upload_kind = |policy| {
        let config = ConsoleConfig::new().with_unknown_extension(policy);
        let mut console = Console::new(ConsoleSeed::demo().unwrap(), config);
        let mut session = console.open_view("/marketing").unwrap();
        let id = session.upload_file(console.store_mut(), "moodboard.heic", None).unwrap();
        let contents = session.contents(console.store());
        assert_eq!(contents[0].id(), &id);
        assert!(query::find(&contents, &NodeId::from("mkt-1")).is_some());
        contents[0].kind()
    };

    assert_eq!(upload_kind(UnknownExtensionPolicy::Unknown), NodeKind::Unknown);
    assert_eq!(upload_kind(UnknownExtensionPolicy::ImageBucket), NodeKind::Jpg);
}
