//! Integration tests for quillnotes
//!
//! These tests verify end-to-end functionality including:
//! - The note lifecycle across status buckets
//! - Snapshot persistence and restore
//! - First-run seeding

use quillnotes::app::App;
use quillnotes::config::SESSION_DB_FILE;
use quillnotes::database::{NoteStatus, OptionKind};
use tempfile::TempDir;

#[tokio::test]
async fn test_note_lifecycle_scenario() {
    let temp = TempDir::new().unwrap();
    let app = App::bootstrap(temp.path()).await.unwrap();

    let id = app
        .notes
        .create_note("hello", NoteStatus::Default)
        .await
        .unwrap();

    let notes = app.notes.list_notes(NoteStatus::Default).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "hello");
    assert!(!notes[0].is_favorite);
    assert_eq!(notes[0].status, NoteStatus::Default);

    app.notes.move_to(id, NoteStatus::Archived).await.unwrap();

    assert!(app
        .notes
        .list_notes(NoteStatus::Default)
        .await
        .unwrap()
        .is_empty());

    let archived = app.notes.list_notes(NoteStatus::Archived).await.unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].previous_status, NoteStatus::Default);

    app.shutdown().await;
}

#[tokio::test]
async fn test_snapshot_round_trip_across_sessions() {
    let temp = TempDir::new().unwrap();

    let first = App::bootstrap(temp.path()).await.unwrap();
    let id = first
        .notes
        .create_note("persisted across sessions", NoteStatus::Default)
        .await
        .unwrap();
    first.settings.set("theme", "dark").await.unwrap();
    first.shutdown().await;

    // Drop the working copy; the slot snapshot alone must carry the data.
    std::fs::remove_file(temp.path().join(SESSION_DB_FILE)).unwrap();

    let second = App::bootstrap(temp.path()).await.unwrap();

    let notes = second.notes.list_notes(NoteStatus::Default).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, id);
    assert_eq!(notes[0].content, "persisted across sessions");

    assert_eq!(second.settings.get("theme").await.as_deref(), Some("dark"));

    // Seeded rows came back through the snapshot too, without reseeding.
    let sizes = second.text_options.list(OptionKind::Size).await.unwrap();
    assert_eq!(sizes.len(), 8);
    assert_eq!(second.assets.list().await.unwrap().len(), 7);

    second.shutdown().await;
}

#[tokio::test]
async fn test_restore_and_permanent_delete_flow() {
    let temp = TempDir::new().unwrap();
    let app = App::bootstrap(temp.path()).await.unwrap();

    let id = app
        .notes
        .create_note("restore me", NoteStatus::Default)
        .await
        .unwrap();

    app.notes.move_to(id, NoteStatus::Archived).await.unwrap();
    app.notes.move_to(id, NoteStatus::Deleted).await.unwrap();

    // Restore sends the note back to the archive it came from.
    let target = app.notes.restore_note(id).await.unwrap();
    assert_eq!(target, NoteStatus::Archived);

    // Permanent deletion refuses anything outside the deleted bucket.
    assert!(app.notes.delete_forever(id).await.is_err());

    app.notes.move_to(id, NoteStatus::Deleted).await.unwrap();
    app.notes.delete_forever(id).await.unwrap();

    for status in [NoteStatus::Default, NoteStatus::Archived, NoteStatus::Deleted] {
        assert!(app.notes.list_notes(status).await.unwrap().is_empty());
    }

    app.shutdown().await;
}

#[tokio::test]
async fn test_favorite_ordering_and_round_trip() {
    let temp = TempDir::new().unwrap();
    let app = App::bootstrap(temp.path()).await.unwrap();

    let first = app
        .notes
        .create_note("plain", NoteStatus::Default)
        .await
        .unwrap();
    let second = app
        .notes
        .create_note("starred", NoteStatus::Default)
        .await
        .unwrap();

    app.notes.toggle_favorite(second).await.unwrap();

    let notes = app.notes.list_notes(NoteStatus::Default).await.unwrap();
    assert_eq!(notes[0].id, second);
    assert_eq!(notes[1].id, first);

    let favorites = app.notes.list_favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);

    // Toggling twice lands back where it started.
    app.notes.toggle_favorite(second).await.unwrap();
    assert!(app.notes.list_favorites().await.unwrap().is_empty());

    app.shutdown().await;
}

#[tokio::test]
async fn test_search_functionality() {
    let temp = TempDir::new().unwrap();
    let app = App::bootstrap(temp.path()).await.unwrap();

    app.notes
        .create_note("Buy milk and bread", NoteStatus::Default)
        .await
        .unwrap();
    app.notes
        .create_note("Fix the login bug", NoteStatus::Default)
        .await
        .unwrap();
    app.notes
        .create_note("old milk coupon", NoteStatus::Archived)
        .await
        .unwrap();

    let milk = app.notes.search("MILK", None).await;
    assert_eq!(milk.len(), 2);

    let archived_milk = app.notes.search("milk", Some(NoteStatus::Archived)).await;
    assert_eq!(archived_milk.len(), 1);
    assert_eq!(archived_milk[0].content, "old milk coupon");

    assert!(app.notes.search("nonexistent", None).await.is_empty());
    assert!(app.notes.search("", Some(NoteStatus::Default)).await.is_empty());

    app.shutdown().await;
}

#[tokio::test]
async fn test_seeding_is_idempotent_across_bootstraps() {
    let temp = TempDir::new().unwrap();

    let first = App::bootstrap(temp.path()).await.unwrap();
    let sizes = first.text_options.list(OptionKind::Size).await.unwrap();
    let formats = first.text_options.list(OptionKind::Format).await.unwrap();
    let colors = first.text_options.list(OptionKind::Color).await.unwrap();
    let assets = first.assets.list().await.unwrap();
    first.shutdown().await;

    let second = App::bootstrap(temp.path()).await.unwrap();
    assert_eq!(
        second.text_options.list(OptionKind::Size).await.unwrap().len(),
        sizes.len()
    );
    assert_eq!(
        second
            .text_options
            .list(OptionKind::Format)
            .await
            .unwrap()
            .len(),
        formats.len()
    );
    assert_eq!(
        second
            .text_options
            .list(OptionKind::Color)
            .await
            .unwrap()
            .len(),
        colors.len()
    );
    assert_eq!(second.assets.list().await.unwrap().len(), assets.len());
    second.shutdown().await;
}

#[tokio::test]
async fn test_bootstrap_survives_a_corrupt_slot() {
    let temp = TempDir::new().unwrap();

    std::fs::write(temp.path().join("app-database.json"), "garbage bytes").unwrap();

    let app = App::bootstrap(temp.path()).await.unwrap();

    assert!(app
        .notes
        .list_notes(NoteStatus::Default)
        .await
        .unwrap()
        .is_empty());

    // The fresh store is fully usable and re-seeds as a first run.
    assert_eq!(app.assets.list().await.unwrap().len(), 7);

    app.shutdown().await;
}

#[tokio::test]
async fn test_welcome_flag_survives_reopen() {
    let temp = TempDir::new().unwrap();

    let first = App::bootstrap(temp.path()).await.unwrap();
    assert!(!first.settings.has_seen_welcome().await);
    first.settings.mark_welcome_seen().await.unwrap();
    first.shutdown().await;

    let second = App::bootstrap(temp.path()).await.unwrap();
    assert!(second.settings.has_seen_welcome().await);
    second.shutdown().await;
}
