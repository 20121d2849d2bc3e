//! Integration tests for `CatalogController`.

mod common;

use std::sync::Arc;

use sheetflow_core::files::{FileRecord, FileStatus};
use sheetflow_core::notice::{NoticeLevel, MSG_LOAD_FAILED};
use sheetflow_events::NoticeBus;
use sheetflow_workflow::{CatalogController, CatalogPhase};

use common::{Calls, FakeTransport};

fn controller() -> (Arc<FakeTransport>, Arc<NoticeBus>, CatalogController) {
    let fake = Arc::new(FakeTransport::new());
    let notices = Arc::new(NoticeBus::default());
    let catalog = CatalogController::new(fake.clone(), Arc::clone(&notices));
    (fake, notices, catalog)
}

#[tokio::test]
async fn starts_idle_and_empty() {
    let (fake, _notices, catalog) = controller();

    assert_eq!(catalog.phase().await, CatalogPhase::Idle);
    assert!(catalog.files().await.is_empty());
    assert_eq!(Calls::get(&fake.calls.list), 0);
}

#[tokio::test]
async fn load_replaces_list_wholesale() {
    let (fake, _notices, catalog) = controller();
    fake.set_files(vec![FileRecord::new(1, "a.xlsx"), FileRecord::new(2, "b.xls")]);
    assert_eq!(catalog.load_files().await, CatalogPhase::Loaded);

    fake.set_files(vec![FileRecord::new(3, "c.xlsx")]);
    assert_eq!(catalog.load_files().await, CatalogPhase::Loaded);

    let ids: Vec<_> = catalog.files().await.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![3]);
    assert!(catalog.find(1).await.is_none());
    assert_eq!(catalog.find(3).await.unwrap().filename, "c.xlsx");
}

#[tokio::test]
async fn failed_load_keeps_previous_list_and_notifies() {
    let (fake, notices, catalog) = controller();
    fake.set_files(vec![FileRecord::new(1, "a.xlsx")]);
    catalog.load_files().await;
    let mut rx = notices.subscribe();

    fake.fail_list(500);
    assert_eq!(catalog.load_files().await, CatalogPhase::Failed);

    assert_eq!(catalog.files().await.len(), 1);
    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, MSG_LOAD_FAILED);
}

#[tokio::test]
async fn listed_files_default_to_uploaded() {
    let (fake, _notices, catalog) = controller();
    fake.set_files(vec![FileRecord::new(1, "a.xlsx"), FileRecord::new(2, "b.xlsx")]);
    catalog.load_files().await;
    catalog.record_milestone(2, FileStatus::Inserted).await;

    let entries = catalog.entries().await;
    assert_eq!(entries[0].status, FileStatus::Uploaded);
    assert_eq!(entries[1].status, FileStatus::Inserted);
    assert_eq!(catalog.status_of(99).await, None);
}

#[tokio::test]
async fn milestones_never_move_backwards() {
    let (_fake, _notices, catalog) = controller();

    assert_eq!(catalog.record_milestone(4, FileStatus::Inserted).await, FileStatus::Inserted);
    assert_eq!(catalog.record_milestone(4, FileStatus::Previewed).await, FileStatus::Inserted);
    assert_eq!(catalog.record_milestone(4, FileStatus::Deleted).await, FileStatus::Deleted);
    assert_eq!(catalog.record_milestone(4, FileStatus::Uploaded).await, FileStatus::Deleted);
}
