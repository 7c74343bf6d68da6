// tests/store_basic.rs
//
// Покрываем:
// 1) initialize: создаёт документ с seed-алиасами, повторный вызов не трогает файл.
// 2) add / resolve / remove / remove_at.
// 3) Ошибки: пустой alias, неизвестный alias, битый документ.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use WinDeck::{AliasStore, WinDeckError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("wdtest-store-{prefix}-{pid}-{t}-{id}"))
}

#[test]
fn initialize_seeds_once() -> Result<()> {
    let root = unique_root("init");
    let store = AliasStore::new(root.join("nested").join("quickpaths.xml"));

    assert!(store.initialize()?, "first initialize must create the document");
    let aliases: Vec<String> = store.list()?.into_iter().map(|e| e.alias).collect();
    assert_eq!(aliases, vec!["desktop", "documents"]);

    let before = fs::read(store.path())?;
    assert!(!store.initialize()?, "second initialize must be a no-op");
    let after = fs::read(store.path())?;
    assert_eq!(before, after, "existing document must stay byte-identical");
    Ok(())
}

#[test]
fn initialize_refuses_invalid_document() -> Result<()> {
    let root = unique_root("init-bad");
    fs::create_dir_all(&root)?;
    let path = root.join("quickpaths.xml");
    fs::write(&path, "this is not xml")?;

    let store = AliasStore::new(&path);
    let err = store.initialize().unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    assert_eq!(fs::read_to_string(&path)?, "this is not xml");
    Ok(())
}

#[test]
fn add_resolve_remove_roundtrip() -> Result<()> {
    let root = unique_root("kv");
    fs::create_dir_all(&root)?;
    let store = AliasStore::new(root.join("quickpaths.xml"));
    store.initialize()?;

    // Существующий путь сохраняется абсолютным
    let dir = root.join("work");
    fs::create_dir_all(&dir)?;
    let e = store.add("work", &dir.display().to_string())?;
    assert!(PathBuf::from(&e.location).is_absolute());
    assert_eq!(store.resolve("work")?, e.location);

    // Несуществующий - как есть
    let e2 = store.add("later", "not/yet/there")?;
    assert_eq!(e2.location, "not/yet/there");

    let removed = store.remove("work")?;
    assert_eq!(removed.map(|r| r.alias).as_deref(), Some("work"));
    match store.resolve("work") {
        Err(WinDeckError::NotFound(msg)) => assert!(msg.contains("'work'"), "{msg}"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    // Повторное удаление - no-op
    assert!(store.remove("work")?.is_none());
    Ok(())
}

#[test]
fn add_rejects_empty_alias() -> Result<()> {
    let root = unique_root("empty");
    let store = AliasStore::new(root.join("quickpaths.xml"));
    store.initialize()?;
    let before = fs::read(store.path())?;

    let err = store.add("   ", "/tmp").unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    let err = store.add("x", "").unwrap_err();
    assert!(err.is_validation(), "got {err:?}");

    assert_eq!(before, fs::read(store.path())?);
    Ok(())
}

#[test]
fn duplicate_alias_appends_and_first_wins() -> Result<()> {
    let root = unique_root("dup");
    let store = AliasStore::new(root.join("quickpaths.xml"));
    store.initialize()?;

    store.add("proj", "first/location")?;
    store.add("proj", "second/location")?;

    let n = store.list()?.iter().filter(|e| e.alias == "proj").count();
    assert_eq!(n, 2);
    assert_eq!(store.resolve("proj")?, "first/location");

    // Удаление снимает только первую запись
    store.remove("proj")?;
    assert_eq!(store.resolve("proj")?, "second/location");
    Ok(())
}

#[test]
fn remove_by_position() -> Result<()> {
    let root = unique_root("rm-at");
    let store = AliasStore::new(root.join("quickpaths.xml"));
    store.initialize()?;
    store.add("third", "c")?;

    let removed = store.remove_at(2)?;
    assert_eq!(removed.alias, "documents");
    let aliases: Vec<String> = store.list()?.into_iter().map(|e| e.alias).collect();
    assert_eq!(aliases, vec!["desktop", "third"]);

    assert!(store.remove_at(0).unwrap_err().is_not_found());
    assert!(store.remove_at(3).unwrap_err().is_not_found());
    Ok(())
}
