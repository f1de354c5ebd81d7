use quickide_core::manifest::{Manifest, ProjectConfig, PROJECT_FILE};
use quickide_core::project::Severity;
use quickide_core::{Error, NewProject, PackSide, ProjectStore};
use std::fs;

// Walks one project through its whole life: create, open, break, repair,
// regenerate UUIDs and delete, checking the manifest cross-link at each step.

fn assert_linked(project: &quickide_core::Project) {
    let behavior = Manifest::load(project.manifest_path(PackSide::Behavior)).unwrap();
    let resource = Manifest::load(project.manifest_path(PackSide::Resource)).unwrap();
    assert_eq!(
        behavior.dependencies[0].uuid,
        Some(resource.header.uuid),
        "behavior pack must depend on the resource pack header"
    );
}

#[test]
fn project_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ProjectStore::new(tmp.path().join("projects")).unwrap();
    assert!(store.list().unwrap().is_empty());

    let options = NewProject::default().with_description("Gems and more");
    store.create("Demo", &options).unwrap();

    // Created projects open cleanly
    let project = store.open("Demo").unwrap();
    assert_eq!(project.config().description, "Gems and more");
    assert!(project.validate().is_empty());
    assert_linked(&project);

    // Losing a pack makes open fail until repaired
    fs::remove_dir_all(project.pack_path(PackSide::Resource)).unwrap();
    match store.open("Demo") {
        Err(Error::IncompleteStructure { project, missing }) => {
            assert_eq!(project, "Demo");
            assert_eq!(missing, vec![PackSide::Resource]);
        }
        other => panic!("expected incomplete structure, got {:?}", other.map(|p| p.name().to_string())),
    }
    let repaired = store.repair("Demo").unwrap();
    assert_linked(&repaired);
    let project = store.open("Demo").unwrap();
    assert!(project
        .validate()
        .iter()
        .all(|issue| issue.severity == Severity::Warning));

    // Regeneration keeps the link and updates project.json
    let before = project.config().uuids;
    let uuids = store.regenerate_uuids("Demo").unwrap();
    assert_ne!(before.behavior_pack.header, uuids.behavior_pack.header);
    assert_ne!(before.resource_pack.header, uuids.resource_pack.header);
    assert_linked(&project);
    let config = ProjectConfig::load(project.path().join(PROJECT_FILE)).unwrap();
    assert_eq!(config.uuids, uuids);

    store.delete("Demo").unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(store.open("Demo").unwrap_err().is_not_found());
}

#[test]
fn create_twice_is_rejected_without_touching_the_first() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ProjectStore::new(tmp.path()).unwrap();

    let first = store.create("Demo", &NewProject::default()).unwrap();
    let manifest = fs::read_to_string(first.manifest_path(PackSide::Behavior)).unwrap();

    assert!(store
        .create("Demo", &NewProject::default())
        .unwrap_err()
        .is_already_exists());
    assert_eq!(
        fs::read_to_string(first.manifest_path(PackSide::Behavior)).unwrap(),
        manifest
    );
}

#[test]
fn every_created_project_is_listed() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ProjectStore::new(tmp.path()).unwrap();
    for name in ["One", "Two", "Three"] {
        store.create(name, &NewProject::default()).unwrap();
    }

    let mut names = store.list().unwrap();
    names.sort();
    assert_eq!(names, vec!["One", "Three", "Two"]);
}
