use anyhow::Result;
use lifegrid::persistence;
use lifegrid::MapStore;

use crate::state::AppState;

pub fn list(state: &AppState) -> Result<()> {
    let names = state.maps.list()?;
    if names.is_empty() {
        println!("No saved maps in {}", state.maps.root().display());
        return Ok(());
    }

    for name in names {
        println!("{}", describe(&state.maps, &name));
    }
    Ok(())
}

fn describe(store: &dyn MapStore, name: &str) -> String {
    let summary = store
        .read_all(name)
        .and_then(|bytes| persistence::from_json(&String::from_utf8_lossy(&bytes)));

    match summary {
        Ok(map) => {
            let population = map.cells.iter().filter(|c| c.alive).count();
            let saved = map
                .saved_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:<20} {:>3}x{:<3} population {:<5} saved {}",
                name, map.columns, map.rows, population, saved
            )
        }
        Err(e) => format!("{:<20} unreadable: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid::{Grid, MemoryStore};

    #[test]
    fn test_describe_map() {
        let store = MemoryStore::new();
        let grid = Grid::from_state(2, 2, &[true, false, true, true]).unwrap();
        let json = persistence::to_json(&persistence::encode(&grid, "Last")).unwrap();
        store.write_all("Last", json.as_bytes()).unwrap();
        store.write_all("Bad", b"oops").unwrap();

        let line = describe(&store, "Last");
        assert!(line.contains("2x2"));
        assert!(line.contains("population 3"));
        assert!(describe(&store, "Bad").contains("unreadable"));
    }
}
