use jukecache::janitor;
use std::time::Duration;

#[tokio::test]
async fn test_sweep_removes_only_stale_audio_files() {
    let temp_dir = tempfile::tempdir().unwrap();

    let stale = temp_dir.path().join("stale.m4a");
    let other = temp_dir.path().join("notes.txt");
    std::fs::write(&stale, b"old audio").unwrap();
    std::fs::write(&other, b"not audio").unwrap();

    // Laisser vieillir les deux premiers fichiers avant de créer le frais
    tokio::time::sleep(Duration::from_millis(300)).await;

    let fresh = temp_dir.path().join("fresh.m4a");
    std::fs::write(&fresh, b"new audio").unwrap();

    let removed = janitor::sweep(temp_dir.path(), Duration::from_millis(150))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(!stale.exists());
    assert!(fresh.exists());
    // Les fichiers qui ne sont pas des fichiers audio du cache sont ignorés
    assert!(other.exists());
}

#[tokio::test]
async fn test_sweep_keeps_everything_under_max_age() {
    let temp_dir = tempfile::tempdir().unwrap();

    let file = temp_dir.path().join("track.m4a");
    std::fs::write(&file, b"audio").unwrap();

    let removed = janitor::sweep(temp_dir.path(), janitor::DEFAULT_MAX_AGE)
        .await
        .unwrap();

    assert_eq!(removed, 0);
    assert!(file.exists());
}

#[tokio::test]
async fn test_sweep_on_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();

    let removed = janitor::sweep(temp_dir.path(), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(removed, 0);
}
