#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT: AtomicUsize = AtomicUsize::new(0);

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("dataset-fixtures")
}

/// Write `contents` to a fresh file and return its path.
pub fn write_dataset(name: &str, contents: &str) -> PathBuf {
    let dir = fixture_root();
    fs::create_dir_all(&dir).expect("create fixture directory");
    let id = NEXT.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("{}-{}-{}.txt", name, std::process::id(), id));
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Render one record line with the values group before the keys group.
pub fn record_line(prefix: &[&str], values: &[f64], keys: &[String]) -> String {
    let mut fields: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    fields.push(keys.len().to_string());
    fields.extend(values.iter().map(|v| v.to_string()));
    fields.extend(keys.iter().cloned());
    fields.join(" ")
}
