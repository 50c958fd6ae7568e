use anyhow::Result;
use drive::memory::MEMORY_ROOT_ID;
use drive::{Drive, DriveError, MemoryBackend, StorageBackend};
use navcache::{Child, EntryKind, NavError, NavigationCache};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

struct Fixture {
    tmp: TempDir,
    backend: Arc<MemoryBackend>,
    docs_id: String,
}

impl Fixture {
    /// root: docs/ (x.txt, sub/), a.txt
    async fn new() -> Result<Self> {
        let tmp = tempdir()?;
        let backend = Arc::new(MemoryBackend::new());
        let docs_id = backend.create_dir(MEMORY_ROOT_ID, "docs").await?;
        let _ = backend.create_file(&docs_id, "x.txt", b"x contents").await?;
        let _ = backend.create_dir(&docs_id, "sub").await?;
        let _ = backend.create_file(MEMORY_ROOT_ID, "a.txt", b"a contents").await?;
        Ok(Self {
            tmp,
            backend,
            docs_id,
        })
    }

    fn list_file(&self) -> std::path::PathBuf {
        self.tmp.path().join("data").join("memory_list.json")
    }

    /// A fresh Drive over the same backend and state file, like a new CLI run
    fn drive(&self) -> Drive {
        Drive::new(self.backend.clone(), NavigationCache::open(self.list_file()))
    }
}

#[tokio::test]
async fn test_ls_cd_pwd_across_runs() -> Result<()> {
    let fx = Fixture::new().await?;

    let listing = fx.drive().list("", true).await?;
    assert_eq!(listing.get("docs"), Some(&Child::directory(fx.docs_id.clone())));
    assert_eq!(fx.drive().current_dir()?, "/top");

    let docs = fx.drive().list("docs", true).await?;
    assert!(docs.contains_key("x.txt"));
    assert_eq!(fx.drive().current_dir()?, "/top/docs");

    let _ = fx.drive().list("sub", true).await?;
    assert_eq!(fx.drive().current_dir()?, "/top/docs/sub");

    let up = fx.drive().list("../", true).await?;
    assert!(up.contains_key("sub"));
    assert_eq!(fx.drive().current_dir()?, "/top/docs");

    let top = fx.drive().list("../", true).await?;
    assert!(top.contains_key("a.txt"));
    assert_eq!(fx.drive().current_dir()?, "/top");
    Ok(())
}

#[tokio::test]
async fn test_ls_with_name_does_not_move() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.list("", true).await?;

    let docs = drive.list("docs", false).await?;
    assert!(docs.contains_key("sub"));
    assert_eq!(drive.current_dir()?, "/top");
    Ok(())
}

#[tokio::test]
async fn test_cannot_list_a_file() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    let err = drive.list("a.txt", true).await.unwrap_err();
    assert!(matches!(err, DriveError::NotADirectory(_)));
    assert!(drive.is_file("a.txt")?);
    assert!(!drive.is_file("docs")?);
    assert!(!drive.is_file("missing")?);
    assert!(!drive.is_file("../")?);
    Ok(())
}

#[tokio::test]
async fn test_climbing_past_root_is_local() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    assert!(!drive.exists("../").await?);
    let err = drive.list("../", true).await.unwrap_err();
    assert!(matches!(err, DriveError::Nav(NavError::PathEscapesRoot { .. })));

    let _ = drive.list("docs", true).await?;
    assert!(drive.exists("../").await?);
    assert!(!drive.exists("../../").await?);
    Ok(())
}

#[tokio::test]
async fn test_upload_and_download() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;
    let _ = drive.list("docs", true).await?;

    let local = fx.tmp.path().join("report.csv");
    std::fs::write(&local, b"a,b\n1,2\n")?;
    let name = drive.upload(&local, false).await?;
    assert_eq!(name, "report.csv");
    assert_eq!(drive.cache().child_kind("report.csv")?.kind, EntryKind::File);

    let out = fx.tmp.path().join("out");
    std::fs::create_dir(&out)?;
    let path = drive.download("report.csv", &out).await?;
    assert_eq!(std::fs::read(path)?, b"a,b\n1,2\n");
    Ok(())
}

#[tokio::test]
async fn test_upload_keeps_existing_file_unless_overwrite() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;
    let a_id = drive.cache().child_kind("a.txt")?.id;

    let local = fx.tmp.path().join("a.txt");
    std::fs::write(&local, b"replacement")?;
    let err = drive.upload(&local, false).await.unwrap_err();
    assert!(matches!(err, DriveError::AlreadyExists(ref name) if name == "a.txt"));
    assert_eq!(fx.backend.download(&a_id).await?, b"a contents");

    let name = drive.upload(&local, true).await?;
    assert_eq!(name, "a.txt");
    assert_eq!(fx.backend.download(&a_id).await?, b"replacement");
    Ok(())
}

#[tokio::test]
async fn test_upload_rejects_directories_and_missing_files() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();

    let err = drive.upload(fx.tmp.path(), false).await.unwrap_err();
    assert!(matches!(err, DriveError::DirectoryUpload(_)));

    let err = drive.upload(&fx.tmp.path().join("nope.bin"), false).await.unwrap_err();
    assert!(matches!(err, DriveError::LocalNotFound(_)));
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_download_requires_a_file() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    let err = drive.download("docs", fx.tmp.path()).await.unwrap_err();
    assert!(matches!(err, DriveError::NotAFile(_)));

    let err = drive.download("", fx.tmp.path()).await.unwrap_err();
    assert!(matches!(err, DriveError::EmptyName));

    let err = drive.download("ghost.txt", fx.tmp.path()).await.unwrap_err();
    assert!(matches!(err, DriveError::Nav(NavError::UnknownChild(_))));
    Ok(())
}

#[tokio::test]
async fn test_mkdir_and_delete() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    drive.mkdir("photos").await?;
    assert_eq!(drive.cache().child_kind("photos")?.kind, EntryKind::Directory);
    let err = drive.mkdir("photos").await.unwrap_err();
    assert!(matches!(err, DriveError::AlreadyExists(_)));

    assert!(drive.has_children("docs").await?);
    assert!(!drive.has_children("photos").await?);
    assert!(!drive.has_children("a.txt").await?);

    drive.delete("photos").await?;
    assert!(matches!(
        drive.cache().child_kind("photos"),
        Err(NavError::UnknownChild(_))
    ));
    assert!(matches!(
        drive.delete("../").await.unwrap_err(),
        DriveError::InvalidName(_)
    ));
    Ok(())
}

#[tokio::test]
async fn test_properties() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    let props = drive.properties("a.txt").await?;
    assert_eq!(props.get("size"), Some("10"));

    let err = drive.properties("nothing").await.unwrap_err();
    assert!(matches!(err, DriveError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_out_of_band_delete_drops_stale_child() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;

    fx.backend.delete(&fx.docs_id).await?;

    let err = drive.list("docs", true).await.unwrap_err();
    assert!(matches!(err, DriveError::Stale(ref name) if name == "docs"));
    assert!(matches!(
        fx.drive().cache().child_kind("docs"),
        Err(NavError::UnknownChild(_))
    ));
    assert_eq!(drive.current_dir()?, "/top");
    Ok(())
}

#[tokio::test]
async fn test_vanished_current_directory_is_abandoned() -> Result<()> {
    let fx = Fixture::new().await?;
    let mut drive = fx.drive();
    let _ = drive.refresh().await?;
    let _ = drive.list("docs", true).await?;

    fx.backend.delete(&fx.docs_id).await?;

    let err = drive.list("", true).await.unwrap_err();
    assert!(matches!(err, DriveError::Stale(ref path) if path == "/top/docs"));
    assert_eq!(drive.current_dir()?, "/top");

    // The next listing works again, from the root
    let top = fx.drive().list("", true).await?;
    assert!(!top.contains_key("docs"));
    assert!(top.contains_key("a.txt"));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_state_needs_reset() -> Result<()> {
    let fx = Fixture::new().await?;
    std::fs::create_dir_all(fx.tmp.path().join("data"))?;
    std::fs::write(fx.list_file(), b"\x04\x08[")?;

    let mut drive = fx.drive();
    let err = drive.list("", true).await.unwrap_err();
    assert!(err.needs_reset());
    assert!(!err.is_not_found());

    let listing = drive.bootstrap().await?;
    assert!(listing.contains_key("docs"));
    assert_eq!(fx.drive().current_dir()?, "/top");
    Ok(())
}
