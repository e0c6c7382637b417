use dashmap::DashMap;
use json_prefs::{DefaultTable, PrefsStore};
use serde_json::Value;
use std::sync::Arc;

fn main() -> Result<(), json_prefs::Error> {
    tracing_subscriber::fmt::init();

    let dir = std::env::temp_dir().join("json_prefs_example_dashmap");
    let prefs = Arc::new(
        PrefsStore::<DashMap<String, Value>>::builder_with_backend()
            .data_dir(&dir)
            .defaults(DefaultTable::new().with("counter", 0))
            .build()?,
    );

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let prefs = Arc::clone(&prefs);
            std::thread::spawn(move || {
                for i in 0..5 {
                    let _ = prefs.set(format!("worker-{t}"), i);
                }
            })
        })
        .collect();
    for w in workers {
        let _ = w.join();
    }

    println!("counter = {}", prefs.get("counter"));
    println!("keys    = {:?}", prefs.keys());

    prefs.flush()?;
    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
