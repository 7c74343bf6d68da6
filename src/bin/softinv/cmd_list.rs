use anyhow::Result;

use WinDeck::inventory::{registry::scan_installed, InventoryQuery};
use WinDeck::monitor::record::format_version;

use crate::cli::ArchArg;

pub fn exec(filter: Option<String>, arch: Option<ArchArg>, json: bool) -> Result<()> {
    let all = scan_installed()?;
    let query = InventoryQuery {
        name: filter,
        architecture: arch.map(Into::into),
    };
    let found = query.apply(&all);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No matching software ({} entr(y/ies) scanned)", all.len());
        return Ok(());
    }
    for r in &found {
        println!("{}", r.display_name);
        println!(
            "  version      = {}",
            r.version.as_deref().map(format_version).unwrap_or_else(|| "Unknown".into())
        );
        println!("  architecture = {}", r.architecture);
        println!("  publisher    = {}", r.publisher.as_deref().unwrap_or("Unknown"));
        println!("  product_guid = {}", r.product_guid.as_deref().unwrap_or("-"));
    }
    println!("{} of {} entr(y/ies)", found.len(), all.len());
    Ok(())
}
