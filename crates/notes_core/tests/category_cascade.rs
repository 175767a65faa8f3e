use notes_core::{
    CategoryStore, MemoryGateway, NoteStore, PersistenceGateway, StoreConfig,
};

fn stores(
    gateway: &MemoryGateway,
) -> (CategoryStore<&MemoryGateway>, NoteStore<&MemoryGateway>) {
    let config = StoreConfig::default();
    (
        CategoryStore::load(gateway, &config),
        NoteStore::load(gateway, config.notes_key.as_str()),
    )
}

fn persisted_notes(gateway: &MemoryGateway) -> Vec<notes_core::Note> {
    let raw = gateway.get("notesapp_notes").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn persisted_categories(gateway: &MemoryGateway) -> Vec<String> {
    let raw = gateway.get("notesapp_categories").unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn adding_twice_keeps_one_occurrence() {
    let gateway = MemoryGateway::new();
    let (mut categories, _notes) = stores(&gateway);

    categories.add("Travel");
    categories.add("Travel");

    let occurrences = categories
        .list()
        .iter()
        .filter(|name| name.as_str() == "Travel")
        .count();
    assert_eq!(occurrences, 1);
    assert_eq!(persisted_categories(&gateway), categories.list());
}

#[test]
fn deleting_a_category_reassigns_its_notes_to_general() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    let work = notes.create("Quarterly plan", "", "Work");
    let ideas = notes.create("Side project", "", "Ideas");

    let outcome = categories.delete("Work", &mut notes);
    assert!(outcome.removed);
    assert_eq!(outcome.reassigned, 1);

    assert_eq!(notes.get_by_id(&work.id).unwrap().category, "General");
    assert_eq!(notes.get_by_id(&ideas.id).unwrap().category, "Ideas");
    assert!(!categories.list().contains(&"Work".to_string()));
}

#[test]
fn cascade_is_written_to_both_persisted_collections() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    let work = notes.create("Quarterly plan", "", "Work");

    categories.delete("Work", &mut notes);

    assert_eq!(persisted_categories(&gateway), vec!["General", "Ideas"]);
    let stored = persisted_notes(&gateway);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, work.id);
    assert_eq!(stored[0].category, "General");

    let (reloaded_categories, reloaded_notes) = stores(&gateway);
    assert_eq!(reloaded_categories.list(), vec!["General", "Ideas"]);
    assert_eq!(reloaded_notes.get_by_id(&work.id).unwrap().category, "General");
}

#[test]
fn cascade_applies_in_memory_when_writes_are_dropped() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    let work = notes.create("Quarterly plan", "", "Work");
    let snapshot_notes = gateway.raw("notesapp_notes");

    gateway.set_reject_writes(true);
    let outcome = categories.delete("Work", &mut notes);

    assert!(outcome.removed);
    assert_eq!(outcome.reassigned, 1);
    assert!(!categories.contains("Work"));
    assert_eq!(notes.get_by_id(&work.id).unwrap().category, "General");
    assert_eq!(gateway.raw("notesapp_notes"), snapshot_notes);
    assert_eq!(gateway.raw("notesapp_categories"), None);
}

#[test]
fn deleting_unknown_category_changes_nothing() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    notes.create("n", "", "Work");
    let writes = gateway.write_count();

    let outcome = categories.delete("Nope", &mut notes);
    assert!(outcome.is_noop());
    assert_eq!(categories.list(), vec!["General", "Work", "Ideas"]);
    assert_eq!(gateway.write_count(), writes);
}

#[test]
fn list_keeps_insertion_order_not_alphabetical() {
    let gateway = MemoryGateway::new();
    let (mut categories, _notes) = stores(&gateway);
    categories.add("Zeta");
    categories.add("Alpha");
    assert_eq!(
        categories.list(),
        vec!["General", "Work", "Ideas", "Zeta", "Alpha"]
    );
}

#[test]
fn dropped_category_write_keeps_memory_consistent_and_notes_persisted() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    categories.add("Travel");
    let work = notes.create("Quarterly plan", "", "Work");

    gateway.reject_writes_for("notesapp_categories");
    let outcome = categories.delete("Work", &mut notes);

    assert!(outcome.removed);
    assert_eq!(outcome.reassigned, 1);
    assert_eq!(categories.list(), vec!["General", "Ideas", "Travel"]);
    assert_eq!(notes.get_by_id(&work.id).unwrap().category, "General");

    // Notes are written before the category list, so only the list is stale.
    assert_eq!(persisted_notes(&gateway)[0].category, "General");
    assert_eq!(
        persisted_categories(&gateway),
        vec!["General", "Work", "Ideas", "Travel"]
    );

    gateway.clear_rejected_keys();
    let (reloaded_categories, reloaded_notes) = stores(&gateway);
    assert!(reloaded_categories.contains("Work"));
    assert_eq!(
        reloaded_notes.get_by_id(&work.id).unwrap().category,
        "General"
    );
}

#[test]
fn deleting_general_then_cascading_relists_it() {
    let gateway = MemoryGateway::new();
    let (mut categories, mut notes) = stores(&gateway);
    let work = notes.create("Quarterly plan", "", "Work");

    let first = categories.delete("General", &mut notes);
    assert!(first.removed);
    assert_eq!(first.reassigned, 0);
    assert_eq!(categories.list(), vec!["Work", "Ideas"]);

    let second = categories.delete("Work", &mut notes);
    assert!(second.fallback_restored);
    assert_eq!(categories.list(), vec!["Ideas", "General"]);
    assert_eq!(notes.get_by_id(&work.id).unwrap().category, "General");
    assert_eq!(persisted_categories(&gateway), vec!["Ideas", "General"]);
}
