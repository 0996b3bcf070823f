use std::rc::Rc;
use tagnote_core::{
    filter, filter_by_query, MemoryMedium, NoteId, NoteQuery, NotebookApi, NotebookConfig,
    NotebookService, SqliteMedium, StoreError, Tag, TagDeletionPolicy, TagId,
};

fn notebook() -> (Rc<MemoryMedium>, NotebookService<MemoryMedium>) {
    let medium = Rc::new(MemoryMedium::new());
    let service = NotebookService::new(Rc::clone(&medium));
    (medium, service)
}

#[test]
fn groceries_scenario_leaves_dangling_reference_after_tag_delete() {
    let (_medium, mut notebook) = notebook();
    let personal = notebook.create_tag("personal").unwrap();
    let note_id = notebook
        .create_note("Groceries", "- milk", &[personal.clone()])
        .unwrap();

    let visible = notebook.list_visible_notes("", &[]).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, note_id);
    assert_eq!(visible[0].title, "Groceries");
    assert_eq!(visible[0].body, "- milk");
    assert_eq!(visible[0].tags, vec![personal.clone()]);

    notebook.delete_tag(&personal.id).unwrap();

    let visible = notebook.list_visible_notes("", &[]).unwrap();
    assert_eq!(visible[0].id, note_id);
    assert!(visible[0].tags.is_empty());
    let stored = notebook.notes().get(&note_id).unwrap().unwrap();
    assert_eq!(stored.tag_ids, vec![personal.id]);
}

#[test]
fn cascade_policy_strips_deleted_tag_from_notes() {
    let medium = Rc::new(MemoryMedium::new());
    let config = NotebookConfig {
        tag_deletion: TagDeletionPolicy::Cascade,
        ..NotebookConfig::default()
    };
    let mut notebook = NotebookService::with_config(Rc::clone(&medium), &config).unwrap();
    let personal = notebook.create_tag("personal").unwrap();
    let work = notebook.create_tag("work").unwrap();
    let note_id = notebook
        .create_note("Plan", "", &[personal.clone(), work.clone()])
        .unwrap();

    notebook.delete_tag(&personal.id).unwrap();

    let stored = notebook.notes().get(&note_id).unwrap().unwrap();
    assert_eq!(stored.tag_ids, vec![work.id.clone()]);
    assert_eq!(notebook.find_note(&note_id).unwrap().unwrap().tags, vec![work]);
}

#[test]
fn empty_queries_return_full_view_in_insertion_order() {
    let (_medium, mut notebook) = notebook();
    let ids: Vec<_> = ["c", "a", "b"]
        .iter()
        .map(|title| notebook.create_note(title, "", &[]).unwrap())
        .collect();

    let visible = notebook.list_visible_notes("", &[]).unwrap();
    let visible_ids: Vec<_> = visible.iter().map(|note| note.id.clone()).collect();
    assert_eq!(visible_ids, ids);
}

#[test]
fn title_filter_is_case_insensitive_substring() {
    let (_medium, mut notebook) = notebook();
    notebook.create_note("Groceries", "", &[]).unwrap();
    notebook.create_note("Gym plan", "", &[]).unwrap();
    notebook.create_note("hungry GROWTH", "", &[]).unwrap();

    let titles: Vec<String> = notebook
        .list_visible_notes("GRO", &[])
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, vec!["Groceries", "hungry GROWTH"]);
    assert!(notebook.list_visible_notes("zzz", &[]).unwrap().is_empty());
}

#[test]
fn tag_filter_is_conjunctive() {
    let (_medium, mut notebook) = notebook();
    let a = notebook.create_tag("A").unwrap();
    let b = notebook.create_tag("B").unwrap();
    let only_a = notebook.create_note("only a", "", &[a.clone()]).unwrap();
    let both = notebook
        .create_note("both", "", &[b.clone(), a.clone()])
        .unwrap();
    notebook.create_note("none", "", &[]).unwrap();

    let ids = |notes: Vec<tagnote_core::DenormalizedNote>| {
        notes.into_iter().map(|note| note.id).collect::<Vec<_>>()
    };
    assert_eq!(
        ids(notebook.list_visible_notes("", &[a.clone()]).unwrap()),
        vec![only_a, both.clone()]
    );
    assert_eq!(
        ids(notebook
            .list_visible_notes("", &[a.clone(), b.clone()])
            .unwrap()),
        vec![both.clone()]
    );
    assert_eq!(
        ids(notebook.list_visible_notes("bo", &[b.clone()]).unwrap()),
        vec![both]
    );
    assert!(notebook
        .list_visible_notes("only", &[a, b])
        .unwrap()
        .is_empty());
}

#[test]
fn resolved_tags_follow_registry_order() {
    let (_medium, mut notebook) = notebook();
    let first = notebook.create_tag("first").unwrap();
    let second = notebook.create_tag("second").unwrap();
    let id = notebook
        .create_note("n", "", &[second.clone(), first.clone()])
        .unwrap();

    let note = notebook.find_note(&id).unwrap().unwrap();
    assert_eq!(note.tags, vec![first, second]);
}

#[test]
fn rename_is_visible_in_next_query() {
    let (_medium, mut notebook) = notebook();
    let tag = notebook.create_tag("personal").unwrap();
    let id = notebook.create_note("n", "", &[tag.clone()]).unwrap();

    notebook.rename_tag(&tag.id, "private").unwrap();

    let note = notebook.find_note(&id).unwrap().unwrap();
    assert_eq!(note.tags[0].label, "private");
    assert_eq!(notebook.available_tags().unwrap()[0].label, "private");
}

#[test]
fn update_and_delete_note_are_reflected_in_queries() {
    let (_medium, mut notebook) = notebook();
    let tag = notebook.create_tag("t").unwrap();
    let id = notebook.create_note("draft", "old", &[]).unwrap();

    notebook.update_note(&id, "final", "new", &[tag.clone()]).unwrap();
    let note = notebook.find_note(&id).unwrap().unwrap();
    assert_eq!((note.title.as_str(), note.body.as_str()), ("final", "new"));
    assert_eq!(note.tags, vec![tag]);

    notebook.delete_note(&id).unwrap();
    assert_eq!(notebook.find_note(&id).unwrap(), None);
    assert!(notebook.list_visible_notes("", &[]).unwrap().is_empty());
}

#[test]
fn view_recomputes_only_after_mutations() {
    let (_medium, mut notebook) = notebook();
    notebook.create_note("n", "", &[]).unwrap();

    notebook.list_visible_notes("", &[]).unwrap();
    notebook.list_visible_notes("n", &[]).unwrap();
    notebook.find_note(&NoteId::new("missing")).unwrap();
    assert_eq!(notebook.view_recomputations(), 1);

    notebook.create_tag("t").unwrap();
    notebook.list_visible_notes("", &[]).unwrap();
    assert_eq!(notebook.view_recomputations(), 2);

    notebook.rename_tag(&TagId::new("missing"), "ghost").unwrap();
    notebook.list_visible_notes("", &[]).unwrap();
    assert_eq!(notebook.view_recomputations(), 3);
}

#[test]
fn filter_is_idempotent() {
    let (_medium, mut notebook) = notebook();
    let tag = notebook.create_tag("t").unwrap();
    notebook.create_note("Alpha", "", &[tag.clone()]).unwrap();
    notebook.create_note("alphabet", "", &[]).unwrap();

    let view = notebook.list_visible_notes("", &[]).unwrap();
    let query = NoteQuery::new("ALPHA", vec![tag]);
    let first = filter_by_query(&view, &query);
    let second = filter(&view, &query.title, &query.tags);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn state_survives_reopening_sqlite_medium() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");

    let (tag, note_id) = {
        let mut notebook = NotebookService::new(Rc::new(SqliteMedium::open(&path).unwrap()));
        let tag = notebook.create_tag("personal").unwrap();
        let id = notebook.create_note("Groceries", "- milk", &[tag.clone()]).unwrap();
        (tag, id)
    };

    let mut reopened = NotebookService::new(Rc::new(SqliteMedium::open(&path).unwrap()));
    assert_eq!(reopened.available_tags().unwrap(), vec![tag.clone()]);
    let note = reopened.find_note(&note_id).unwrap().unwrap();
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.tags, vec![tag]);
}

#[test]
fn corrupt_notes_payload_surfaces_to_queries() {
    let medium = Rc::new(MemoryMedium::new().with_entry("NOTES", "[{\"id\":"));
    let mut notebook = NotebookService::new(Rc::clone(&medium));

    let err = notebook.list_visible_notes("", &[]).unwrap_err();
    assert!(matches!(err, StoreError::CorruptPersistedState { ref key, .. } if key == "NOTES"));
    assert!(notebook.create_note("x", "", &[]).is_err());
    assert_eq!(medium.raw("NOTES").as_deref(), Some("[{\"id\":"));
}

#[test]
fn custom_keys_are_used_for_both_collections() {
    let medium = Rc::new(MemoryMedium::new());
    let config = NotebookConfig::from_json(r#"{"notes_key":"n","tags_key":"t"}"#).unwrap();
    let mut notebook = NotebookService::with_config(Rc::clone(&medium), &config).unwrap();

    notebook.create_tag("x").unwrap();
    notebook.create_note("y", "", &[]).unwrap();
    assert!(medium.raw("t").is_some());
    assert!(medium.raw("n").is_some());
    assert!(medium.raw("NOTES").is_none());
}

#[test]
fn shared_key_config_is_rejected_by_service() {
    let config = NotebookConfig {
        notes_key: "SAME".to_string(),
        tags_key: "SAME".to_string(),
        ..NotebookConfig::default()
    };
    assert!(NotebookService::with_config(Rc::new(MemoryMedium::new()), &config).is_err());
}

#[test]
fn opaque_persisted_ids_resolve_through_the_join() {
    let medium = Rc::new(
        MemoryMedium::new()
            .with_entry("TAGS", r#"[{"id":"T1","label":"personal"}]"#)
            .with_entry(
                "NOTES",
                r#"[{"id":"N1","title":"Groceries","markdown":"- milk","tagIds":["T1"]}]"#,
            ),
    );
    let mut notebook = NotebookService::new(Rc::clone(&medium));

    let visible = notebook.list_visible_notes("", &[]).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, NoteId::new("N1"));
    assert_eq!(visible[0].tags, vec![Tag::with_id("T1", "personal")]);

    notebook
        .update_note(&NoteId::new("N1"), "Groceries", "- eggs", &visible[0].tags)
        .unwrap();
    let raw: serde_json::Value = serde_json::from_str(&medium.raw("NOTES").unwrap()).unwrap();
    assert_eq!(raw[0]["id"], "N1");
    assert_eq!(raw[0]["tagIds"], serde_json::json!(["T1"]));
}

#[test]
fn new_tag_never_reuses_an_id_still_referenced_by_a_note() {
    let (_medium, mut notebook) = notebook();
    let gone = notebook.create_tag("gone").unwrap();
    let note_id = notebook.create_note("n", "", &[gone.clone()]).unwrap();
    notebook.delete_tag(&gone.id).unwrap();

    for idx in 0..20 {
        let tag = notebook.create_tag(&format!("fresh {idx}")).unwrap();
        assert_ne!(tag.id, gone.id);
    }
    let note = notebook.find_note(&note_id).unwrap().unwrap();
    assert!(note.tags.is_empty());
}
