use anyhow::{anyhow, Result};
use std::time::Duration;

use WinDeck::inventory::uninstall::uninstall_batch;
use WinDeck::inventory::{registry::scan_installed, InventoryQuery};

pub fn exec(name: String, timeout_secs: u64, dry_run: bool) -> Result<()> {
    let all = scan_installed()?;
    let found = InventoryQuery::by_name(name.clone()).apply(&all);
    if found.is_empty() {
        return Err(anyhow!("no installed software matches '{}'", name));
    }

    let outcomes = uninstall_batch(&found, Duration::from_secs(timeout_secs), dry_run);

    let mut failed = 0usize;
    for o in &outcomes {
        if !o.executed {
            println!("would run: {}  ({})", o.command_line, o.display_name);
            continue;
        }
        match &o.result {
            Ok(code) => println!("ok      {} (exit code {})", o.display_name, code),
            Err(e) => {
                failed += 1;
                println!("FAILED  {}: {}", o.display_name, e);
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} uninstall(s) failed", failed, outcomes.len()));
    }
    Ok(())
}
