use anyhow::{anyhow, Result};

use WinDeck::inventory::{registry::scan_installed, InventoryQuery};

pub fn exec(name: String) -> Result<()> {
    let all = scan_installed()?;
    let found = InventoryQuery::by_name(name.clone()).apply(&all);
    if found.is_empty() {
        return Err(anyhow!("no installed software matches '{}'", name));
    }

    let mut printed = 0usize;
    for r in &found {
        match &r.product_guid {
            Some(g) => {
                println!("{}  {} ({})", g, r.display_name, r.architecture);
                printed += 1;
            }
            None => eprintln!("warning: '{}' has no product GUID (not an MSI product)", r.display_name),
        }
    }
    if printed == 0 {
        return Err(anyhow!("none of the {} match(es) carries a product GUID", found.len()));
    }
    Ok(())
}
