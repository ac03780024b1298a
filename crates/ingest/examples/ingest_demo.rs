use ingest::fixtures::docx_bytes;
use ingest::{ingest, Extractor, IngestConfig, RawDocument, Row, Table};

fn main() -> Result<(), ingest::IngestError> {
    let doc = RawDocument::new(
        vec![Table::new(vec![
            Row::new(["Symptom", "Mark"]),
            Row::new(["Fever [KD-001]", "+"]),
            Row::new(["Cough", ""]),
            Row::new(["Rash", "\u{FF0B}"]),
        ])],
        vec![
            "Additional notes".into(),
            "\u{2611} Head ache".into(),
            "\u{2610} Dizziness".into(),
        ],
    );
    let bytes = docx_bytes(&doc)?;
    println!("built a {} byte .docx", bytes.len());

    let extractor = Extractor::new(&IngestConfig::default())?;
    for item in ingest(&bytes, &extractor)? {
        println!(
            "{:<16} code={:<8} origin={:?}",
            item.label,
            item.code.as_deref().unwrap_or("-"),
            item.origin
        );
    }

    // Payload limits are checked before the container is opened.
    let strict = Extractor::new(&IngestConfig {
        max_payload_bytes: Some(64),
        ..Default::default()
    })?;
    match ingest(&bytes, &strict) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(err) => println!("rejected: {err}"),
    }
    Ok(())
}
