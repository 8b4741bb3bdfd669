use agenda_checkin::core::catalog::AgendaCatalog;
use agenda_checkin::core::log::LogLogic;
use agenda_checkin::errors::AppError;
use agenda_checkin::models::agenda_item::{AgendaItemPatch, NewAgendaItem};
use agenda_checkin::models::slot::SlotKey;

mod common;
use common::{TestDb, add_item};

#[test]
fn test_get_item_by_slot() {
    let db = TestDb::new();
    let pool = db.open();
    let created = add_item(&pool, "Day 1", 3, false, "Keynote");

    let catalog = AgendaCatalog::new(&pool);
    let found = catalog
        .get_item(&SlotKey::new("Day 1", 3, false))
        .expect("item exists");

    assert_eq!(found.id, created.id);
    assert_eq!(found.title, "Keynote");
    assert!(found.requires_check_in);
    assert!(found.is_active);
}

#[test]
fn test_get_item_missing_slot_is_not_found() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Day 1", 3, false, "Keynote");

    let catalog = AgendaCatalog::new(&pool);
    let missing = SlotKey::new("Day 1", 3, true);

    match catalog.get_item(&missing) {
        Err(AppError::NotFound(slot)) => assert_eq!(slot, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_duplicate_slot_is_rejected() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Day 1", 1, false, "Opening");

    let catalog = AgendaCatalog::new(&pool);
    let res = catalog.create_item(&NewAgendaItem::checkable(
        SlotKey::new("Day 1", 1, false),
        "10:00",
        "Overwrite attempt",
    ));

    assert!(matches!(res, Err(AppError::DuplicateSlot(_))));

    // the original row is untouched
    let item = catalog.get_item(&SlotKey::new("Day 1", 1, false)).unwrap();
    assert_eq!(item.title, "Opening");
}

#[test]
fn test_parallel_sibling_may_share_index() {
    let db = TestDb::new();
    let pool = db.open();
    let main = add_item(&pool, "Day 1", 2, false, "Main track");
    let side = add_item(&pool, "Day 1", 2, true, "Workshop");

    assert_ne!(main.id, side.id);
    assert_eq!(main.item_index, side.item_index);
}

#[test]
fn test_update_onto_occupied_slot_is_duplicate() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Day 1", 1, false, "First");
    let second = add_item(&pool, "Day 1", 2, false, "Second");

    let catalog = AgendaCatalog::new(&pool);
    let patch = AgendaItemPatch {
        item_index: Some(1),
        ..Default::default()
    };

    assert!(matches!(
        catalog.update_item(second.id, &patch),
        Err(AppError::DuplicateSlot(_))
    ));
    assert_eq!(catalog.get_by_id(second.id).unwrap().item_index, 2);
}

#[test]
fn test_update_refreshes_updated_at() {
    let db = TestDb::new();
    let pool = db.open();
    let item = add_item(&pool, "Day 2", 1, false, "Panel");

    std::thread::sleep(std::time::Duration::from_millis(5));

    let catalog = AgendaCatalog::new(&pool);
    let edited = catalog
        .update_item(
            item.id,
            &AgendaItemPatch {
                title: Some("Panel (moved)".into()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(edited.title, "Panel (moved)");
    assert_eq!(edited.created_at, item.created_at);
    assert!(edited.updated_at > item.updated_at);
}

#[test]
fn test_set_active_unknown_id() {
    let db = TestDb::new();
    let pool = db.open();
    let catalog = AgendaCatalog::new(&pool);

    assert!(matches!(
        catalog.set_active(999, false),
        Err(AppError::ItemIdNotFound(999))
    ));
}

#[test]
fn test_list_active_order_and_filter() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Day 1", 2, true, "2 parallel");
    add_item(&pool, "Day 1", 1, false, "1 main");
    add_item(&pool, "Day 1", 2, false, "2 main");
    let closed = add_item(&pool, "Day 1", 3, false, "3 closed");
    add_item(&pool, "Day 2", 1, false, "other day");

    let catalog = AgendaCatalog::new(&pool);
    catalog.set_active(closed.id, false).unwrap();

    let titles: Vec<String> = catalog
        .list_active("Day 1")
        .map(|r| r.unwrap().title)
        .collect();

    assert_eq!(titles, vec!["1 main", "2 main", "2 parallel"]);
}

#[test]
fn test_list_active_is_lazy_and_restartable() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Day 1", 1, false, "A");
    let b = add_item(&pool, "Day 1", 2, false, "B");
    add_item(&pool, "Day 1", 3, false, "C");

    let catalog = AgendaCatalog::new(&pool);
    let mut items = catalog.list_active("Day 1").with_page_size(1);

    assert_eq!(items.next().unwrap().unwrap().title, "A");

    // deactivated after the walk started, before it is reached
    catalog.set_active(b.id, false).unwrap();

    let rest: Vec<String> = items.by_ref().map(|r| r.unwrap().title).collect();
    assert_eq!(rest, vec!["C"]);
    assert!(items.next().is_none());

    catalog.set_active(b.id, true).unwrap();
    items.restart();
    let again: Vec<String> = items.map(|r| r.unwrap().title).collect();
    assert_eq!(again, vec!["A", "B", "C"]);
}

#[test]
fn test_list_day_includes_inactive() {
    let db = TestDb::new();
    let pool = db.open();
    let a = add_item(&pool, "Day 1", 1, false, "A");
    add_item(&pool, "Day 1", 2, false, "B");

    let catalog = AgendaCatalog::new(&pool);
    catalog.set_active(a.id, false).unwrap();

    let all = catalog.list_day("Day 1").unwrap();
    assert_eq!(all.len(), 2);
    assert!(!all[0].is_active);
    assert_eq!(catalog.list_active("Day 1").count(), 1);
}

#[test]
fn test_days_in_first_seen_order() {
    let db = TestDb::new();
    let pool = db.open();
    add_item(&pool, "Opening day", 1, false, "A");
    add_item(&pool, "Day 1", 1, false, "B");
    add_item(&pool, "Opening day", 2, false, "C");

    let days = AgendaCatalog::new(&pool).days().unwrap();
    assert_eq!(days, vec!["Opening day", "Day 1"]);
}

#[test]
fn test_invalid_slot_input() {
    let db = TestDb::new();
    let pool = db.open();
    let catalog = AgendaCatalog::new(&pool);

    let res = catalog.create_item(&NewAgendaItem::checkable(
        SlotKey::new("  ", 1, false),
        "09:00",
        "Nameless day",
    ));
    assert!(matches!(res, Err(AppError::InvalidInput(_))));
}

#[test]
fn test_mutations_are_audited() {
    let db = TestDb::new();
    let pool = db.open();
    let item = add_item(&pool, "Day 1", 1, false, "Audited");

    let catalog = AgendaCatalog::new(&pool);
    catalog.set_active(item.id, false).unwrap();
    catalog.set_active(item.id, true).unwrap();

    let ops: Vec<String> = LogLogic::load(&pool)
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .filter(|op| op.starts_with("agenda_"))
        .collect();

    assert_eq!(
        ops,
        vec!["agenda_add", "agenda_deactivate", "agenda_activate"]
    );
}
