use std::path::PathBuf;

use index::{build_reference, write_reference_map, BuilderConfig, ReferenceIndex, ReferenceSource};

fn main() -> Result<(), index::IndexError> {
    let paragraphs = [
        "Head ache",
        "Often caused by tension or lack of sleep.",
        "Fever",
        "Body temperature above 37.5C.",
        "Возможные причины: infection.",
    ];

    // Build a direct map the same way the offline tool does.
    let map = build_reference(paragraphs, &BuilderConfig::default());
    let path = std::env::temp_dir().join("checkdecode_index_demo.json");
    write_reference_map(&path, &map)?;
    println!("wrote {} keys to {}", map.len(), path.display());

    let index = ReferenceIndex::load(&ReferenceSource::Direct { path: path.clone() })?;
    println!("loaded {} entries in {} mode", index.len(), index.mode());
    for key in index.all_keys() {
        let text = index.lookup_exact(key.as_str()).and_then(|hit| hit.text);
        println!("  {:<12} -> {}", key.as_str(), text.unwrap_or("<no text>").replace('\n', " / "));
    }

    let missing = ReferenceSource::Direct {
        path: PathBuf::from("does-not-exist.json"),
    };
    println!("missing file -> {} entries", ReferenceIndex::load(&missing)?.len());

    let _ = std::fs::remove_file(path);
    Ok(())
}
