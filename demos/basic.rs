use json_prefs::{DefaultTable, PrefsStore};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), json_prefs::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dir = std::env::temp_dir().join("json_prefs_example_basic");
    let prefs = PrefsStore::builder()
        .data_dir(&dir)
        .pretty(true)
        .defaults(
            DefaultTable::new()
                .with("theme", "light")
                .with("zoom-level", 1.0)
                .with("window-bounds", json!({ "width": 800, "height": 600 })),
        )
        .build()?;

    println!("theme (default)   = {}", prefs.get("theme"));

    prefs.set_sync("theme", "dark");
    println!("theme (after set) = {}", prefs.get("theme"));

    // queued on the writer; the outcome goes to the log either way
    let pending = prefs.set("zoom-level", 1.25);
    pending.wait()?;

    let bounds: serde_json::Value = prefs.get_as("window-bounds")?;
    println!("window-bounds     = {bounds}");
    println!("all user values   = {}", json!(prefs.get_all()));

    prefs.unset_sync("theme");
    println!("theme (unset)     = {}", prefs.get("theme"));

    prefs.clear().wait()?;
    println!("after clear: {} user values", prefs.len());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
