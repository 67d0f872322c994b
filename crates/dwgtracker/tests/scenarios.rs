//! End-to-end record keeping scenarios over the public API.

use dwgtracker::storage::Backend;
use dwgtracker::{
    Decision, MemoryBackend, Outcome, Proposal, RecordId, RecordStore, ScriptedPrompt,
    SqliteBackend, Status, StatusFilter, Tracker,
};

fn fill<B: Backend>(t: &mut Tracker<B>, number: &str, name: &str, status: Status, notes: &str) {
    let form = t.form_mut();
    form.dwg_number = number.to_string();
    form.dwg_name = name.to_string();
    form.status = status;
    form.notes = notes.to_string();
}

fn create<B: Backend>(t: &mut Tracker<B>, number: &str, name: &str, status: Status) -> RecordId {
    fill(t, number, name, status, "");
    t.submit(&mut ScriptedPrompt::default())
        .unwrap()
        .record_id()
        .unwrap()
}

fn memory_tracker() -> Tracker<MemoryBackend> {
    Tracker::new(RecordStore::new(MemoryBackend::new()))
}

#[test]
fn create_into_empty_store() {
    let mut t = memory_tracker();
    fill(&mut t, "A-100", "Foundation Plan", Status::Planned, "");

    let outcome = t.submit(&mut ScriptedPrompt::default()).unwrap();
    assert!(matches!(outcome, Outcome::Created(_)));

    let records = t.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.dwg_number, "A-100");
    assert_eq!(record.dwg_name, "Foundation Plan");
    assert_eq!(record.status, Status::Planned);
    assert_eq!(record.notes, "");
    assert_eq!(Some(record.id), outcome.record_id());
    assert!(record.created_at_time().is_some());

    assert_eq!(t.view().len(), 1);
}

#[test]
fn edit_rejects_number_of_another_record() {
    let mut t = memory_tracker();
    create(&mut t, "A-100", "Foundation Plan", Status::Planned);
    let y = create(&mut t, "A-200", "Roof Plan", Status::Planned);
    let before = t.records();

    assert!(t.select(y));
    t.form_mut().dwg_number = "A-100".to_string();

    let err = t.submit(&mut ScriptedPrompt::default()).unwrap_err();
    assert!(err.is_duplicate());
    assert!(err.to_string().contains("A-100"));
    assert_eq!(t.records(), before);
}

#[test]
fn create_with_taken_number_redirects_on_confirm() {
    let mut t = memory_tracker();
    let x = create(&mut t, "A-100", "Foundation Plan", Status::Planned);
    let original = t.find(x).unwrap();

    fill(&mut t, "A-100", "Foundation Plan Rev B", Status::Completed, "revised");
    let mut prompt = ScriptedPrompt::new([true]);
    let outcome = t.submit(&mut prompt).unwrap();

    assert_eq!(outcome, Outcome::Redirected(x));
    assert_eq!(prompt.last_alert(), Some("Existing DWG updated."));

    let records = t.records();
    assert_eq!(records.len(), 1);
    let updated = &records[0];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.dwg_name, "Foundation Plan Rev B");
    assert_eq!(updated.status, Status::Completed);
    assert_eq!(updated.notes, "revised");
}

#[test]
fn two_phase_submit_can_be_driven_by_the_caller() {
    let mut t = memory_tracker();
    let x = create(&mut t, "A-100", "Foundation Plan", Status::Planned);

    fill(&mut t, "a-100", "Other", Status::Archived, "");
    let proposal = t.propose_submit().unwrap();
    assert!(matches!(&proposal, Proposal::ConfirmRedirect { existing, .. } if *existing == x));
    assert!(proposal.confirmation_prompt().is_some());

    assert_eq!(t.apply(proposal, Decision::Abort).unwrap(), Outcome::Aborted);
    assert_eq!(t.find(x).unwrap().dwg_name, "Foundation Plan");
}

#[test]
fn status_filter_selects_only_matching_records() {
    let mut t = memory_tracker();
    create(&mut t, "A-100", "Foundation Plan", Status::Planned);
    let done = create(&mut t, "A-200", "Roof Plan", Status::Completed);
    create(&mut t, "A-300", "Old Plan", Status::Archived);

    let view = t.set_status_filter(StatusFilter::Only(Status::Completed));
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows()[0].id, done);

    let view = t.set_search("roof");
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows()[0].id, done);
}

#[test]
fn bulk_clear_empties_the_store() {
    let mut t = memory_tracker();
    for i in 0..5 {
        create(&mut t, &format!("N-{i}"), "Sheet", Status::Planned);
    }

    assert!(t.clear_all(&mut ScriptedPrompt::new([true])).unwrap());
    assert!(t.records().is_empty());
    assert!(t.store().load().is_empty());
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    let id = {
        let mut t = Tracker::new(RecordStore::new(SqliteBackend::open(&path).unwrap()));
        create(&mut t, "A-100", "Foundation Plan", Status::InProgress)
    };

    let t = Tracker::new(RecordStore::new(SqliteBackend::open(&path).unwrap()));
    let record = t.find(id).unwrap();
    assert_eq!(record.dwg_number, "A-100");
    assert_eq!(record.status, Status::InProgress);
}

#[test]
fn corrupt_slot_loads_as_empty_and_is_replaced_on_save() {
    let mut t = Tracker::new(RecordStore::new(MemoryBackend::with_item(
        "dwgRecords",
        "{not json",
    )));
    assert!(t.records().is_empty());
    assert!(t.view().is_empty());

    create(&mut t, "A-100", "Foundation Plan", Status::Planned);
    assert_eq!(t.records().len(), 1);
}

#[test]
fn ids_are_unique_even_when_created_back_to_back() {
    let mut t = memory_tracker();
    let ids: Vec<RecordId> = (0..50)
        .map(|i| create(&mut t, &format!("S-{i:03}"), "Sheet", Status::Planned))
        .collect();

    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

fn assert_numbers_unique<B: Backend>(t: &Tracker<B>) {
    let mut numbers: Vec<String> = t
        .records()
        .iter()
        .map(|r| r.dwg_number.to_lowercase())
        .collect();
    let total = numbers.len();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), total, "duplicate numbers stored: {numbers:?}");
}

#[test]
fn numbers_stay_unique_through_mixed_submissions() {
    let mut t = memory_tracker();
    let a = create(&mut t, "A-100", "Foundation Plan", Status::Planned);
    let b = create(&mut t, "A-200", "Roof Plan", Status::Planned);
    create(&mut t, "S-001", "Site Plan", Status::Planned);
    assert_numbers_unique(&t);

    // Create with a case variant, confirmed: updates A-100 in place.
    fill(&mut t, "a-100", "Foundation Plan Rev B", Status::InProgress, "");
    assert_eq!(
        t.submit(&mut ScriptedPrompt::new([true])).unwrap(),
        Outcome::Redirected(a)
    );
    assert_numbers_unique(&t);

    // Create with a case variant, declined: nothing changes.
    fill(&mut t, "S-001", "Duplicate Site", Status::Archived, "");
    assert_eq!(
        t.submit(&mut ScriptedPrompt::new([false])).unwrap(),
        Outcome::Aborted
    );
    t.reset_form();
    assert_numbers_unique(&t);

    // Edit into another record's number, in a different case: rejected.
    assert!(t.select(b));
    t.form_mut().dwg_number = "s-001".to_string();
    assert!(t.submit(&mut ScriptedPrompt::default()).unwrap_err().is_duplicate());
    assert_numbers_unique(&t);

    // Edit that only changes the case of its own number: allowed.
    assert!(t.select(b));
    t.form_mut().dwg_number = "a-200".to_string();
    assert_eq!(
        t.submit(&mut ScriptedPrompt::default()).unwrap(),
        Outcome::Updated(b)
    );
    assert_numbers_unique(&t);

    // Edit onto a fresh number, then create with the number it gave up.
    assert!(t.select(b));
    t.form_mut().dwg_number = "A-201".to_string();
    t.submit(&mut ScriptedPrompt::default()).unwrap();
    let again = create(&mut t, "A-200", "Roof Plan Reissue", Status::Planned);
    assert_ne!(again, b);
    assert_numbers_unique(&t);

    assert_eq!(t.records().len(), 4);
}
