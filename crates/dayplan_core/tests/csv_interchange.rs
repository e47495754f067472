use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use chrono_tz::America::New_York;
use dayplan_core::{
    CalendarEvent, CalendarService, Category, FixedClock, ImportReport, InMemoryCalendarGateway,
    MemoryKvStore, Note, NoteStore, Priority, Task, TaskStore,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

#[test]
fn export_tasks_quotes_fields_and_formats_short_dates() {
    let kv = MemoryKvStore::new();
    let mut store = TaskStore::load(&kv, FixedClock::at(now())).unwrap();
    let mut groceries = Task::new("Buy milk, eggs");
    groceries.due_date = Some(Utc.with_ymd_and_hms(2026, 3, 12, 10, 0, 0).unwrap());
    groceries.priority = Priority::High;
    groceries.category = Category::Personal;
    let mut done = Task::new("File taxes");
    done.is_completed = true;
    store.add(groceries).unwrap();
    store.add(done).unwrap();

    let csv = store.export_tasks().unwrap();
    assert_eq!(
        csv,
        "Title,Due Date,Priority,Category,Completed\n\
         \"Buy milk, eggs\",3/12/26,High,Personal,false\n\
         File taxes,,Medium,Other,true\n"
    );
}

#[test]
fn exported_tasks_import_into_a_fresh_store() {
    let source_kv = MemoryKvStore::new();
    let mut source = TaskStore::load(&source_kv, FixedClock::at(now())).unwrap();
    let mut quoted = Task::new("Say \"hi\", then leave");
    quoted.due_date = Some(Utc.with_ymd_and_hms(2026, 4, 1, 18, 30, 0).unwrap());
    quoted.priority = Priority::Low;
    quoted.category = Category::Urgent;
    quoted.is_completed = true;
    source.add(quoted).unwrap();
    source.add(Task::new("Undated")).unwrap();
    let csv = source.export_tasks().unwrap();

    let target_kv = MemoryKvStore::new();
    let mut target = TaskStore::load(&target_kv, FixedClock::at(now())).unwrap();
    let report = target.import_tasks(&csv).unwrap();
    assert_eq!(
        report,
        ImportReport {
            imported: 2,
            skipped: 0
        }
    );

    let imported = &target.tasks()[0];
    assert_eq!(imported.title, "Say \"hi\", then leave");
    assert_eq!(
        imported.due_date,
        Some(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(imported.priority, Priority::Low);
    assert_eq!(imported.category, Category::Urgent);
    assert!(imported.is_completed);
    assert_eq!(target.tasks()[1].due_date, None);
}

#[test]
fn import_skips_malformed_rows_and_defaults_unknown_labels() {
    let kv = MemoryKvStore::new();
    let mut store = TaskStore::load(&kv, FixedClock::at(now())).unwrap();
    let csv = "Title,Due Date,Priority,Category,Completed\n\
               Plan trip,not a date,Someday,Leisure,maybe\n\
               too,few\n\
               a,b,c,d,e,f\n\
               Call mom,3/15/26,High,Personal,true\n";

    let report = store.import_tasks(csv).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 2);

    let trip = &store.tasks()[0];
    assert_eq!(trip.title, "Plan trip");
    assert_eq!(trip.due_date, None);
    assert_eq!(trip.priority, Priority::Medium);
    assert_eq!(trip.category, Category::Other);
    assert!(!trip.is_completed);

    let call = &store.tasks()[1];
    assert_eq!(
        call.due_date,
        Some(Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap())
    );
    assert!(call.is_completed);
}

#[test]
fn import_of_header_only_document_adds_nothing() {
    let kv = MemoryKvStore::new();
    let mut store = TaskStore::load(&kv, FixedClock::at(now())).unwrap();
    let report = store
        .import_tasks("Title,Due Date,Priority,Category,Completed\n")
        .unwrap();
    assert_eq!(report, ImportReport::default());
    assert!(store.tasks().is_empty());
}

#[test]
fn export_dates_follow_clock_offset() {
    let kv = MemoryKvStore::new();
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let mut store = TaskStore::load(&kv, FixedClock::with_offset(now(), tokyo)).unwrap();
    let mut late = Task::new("late");
    late.due_date = Some(Utc.with_ymd_and_hms(2026, 3, 12, 20, 0, 0).unwrap());
    store.add(late).unwrap();

    let csv = store.export_tasks().unwrap();
    assert!(csv.contains("late,3/13/26,Medium,Other,false"));
}

#[test]
fn imported_dates_start_at_local_midnight_of_their_own_season() {
    let kv = MemoryKvStore::new();
    let winter = Utc.with_ymd_and_hms(2026, 1, 20, 15, 0, 0).unwrap();
    let mut store = TaskStore::load(&kv, FixedClock::in_zone(winter, New_York)).unwrap();

    let report = store
        .import_tasks("Title,Due Date,Priority,Category,Completed\nparade,07/04/26,Low,Personal,false\n")
        .unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(
        store.tasks()[0].due_date,
        Some(Utc.with_ymd_and_hms(2026, 7, 4, 4, 0, 0).unwrap())
    );
    assert!(store.export_tasks().unwrap().contains("parade,7/4/26,Low"));
}

#[test]
fn export_notes_keeps_multiline_content_in_one_field() {
    let kv = MemoryKvStore::new();
    let mut store = NoteStore::load(&kv, FixedClock::at(now())).unwrap();
    store
        .add(Note::new(
            "Standup",
            "done: api\ntodo: docs, tests",
            Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap(),
        ))
        .unwrap();

    let csv = store.export_notes().unwrap();
    assert_eq!(
        csv,
        "Title,Date,Content\nStandup,3/9/26,\"done: api\ntodo: docs, tests\"\n"
    );
}

#[test]
fn export_events_covers_the_next_year_and_names_untitled_events() {
    let gateway = InMemoryCalendarGateway::new();
    let event = |id: &str, title: &str, start: DateTime<Utc>| CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        start,
        end: start + Duration::hours(1),
        location: None,
        notes: Some("room 4".to_string()),
    };
    gateway.insert(event("past", "Retro", now() - Duration::days(3)));
    gateway.insert(event("soon", "", now() + Duration::days(2)));
    gateway.insert(event("far", "Offsite", now() + Duration::days(400)));

    let service = CalendarService::new(&gateway);
    let csv = service.export_events(&FixedClock::at(now())).unwrap();
    assert_eq!(
        csv,
        "Title,Start Date,End Date,Notes\nNo Title,3/12/26,3/12/26,room 4\n"
    );
}
