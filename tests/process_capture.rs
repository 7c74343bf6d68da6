// tests/process_capture.rs
//
// Живая таблица процессов (sysinfo): сортировка по pid и denylist.
// Имя собственного процесса берём из первого снимка: формат имени зависит от ОС.

use anyhow::{anyhow, Result};

use WinDeck::monitor::{ProcessSource, SystemProcessSource};

#[test]
fn live_capture_sorted_and_denylisted() -> Result<()> {
    let me = std::process::id();

    let mut open = SystemProcessSource::new(Vec::new());
    let snap = open.capture_processes()?;
    let ids: Vec<u32> = snap.records().iter().map(|r| r.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be sorted: {ids:?}");

    let own_name = snap
        .records()
        .iter()
        .find(|r| r.id == me)
        .map(|r| r.name.clone())
        .ok_or_else(|| anyhow!("own pid {me} missing from live capture"))?;

    // Регистр и ".exe" не важны
    let mut denied = SystemProcessSource::new(vec![format!("{}.EXE", own_name.to_uppercase())]);
    let snap = denied.capture_processes()?;
    assert!(
        snap.records().iter().all(|r| r.id != me),
        "denylisted '{own_name}' must be excluded"
    );
    assert!(snap.records().iter().all(|r| !r.name.eq_ignore_ascii_case(&own_name)));
    Ok(())
}
