//! Concurrency and thread safety tests: one pipeline and one reference
//! snapshot shared by many request threads.

use std::sync::{Arc, RwLock};
use std::thread;

use checkdecode::{decode_document, Pipeline, PipelineConfig, ReferenceIndex};
use ingest::fixtures::docx_bytes;
use ingest::{RawDocument, Row, Table};

fn upload(label: &str) -> Vec<u8> {
    let doc = RawDocument::new(
        vec![Table::new(vec![Row::new([label, "+"])])],
        vec!["\u{2611} Head ache".into()],
    );
    docx_bytes(&doc).expect("fixture")
}

#[test]
fn concurrent_decodes_share_one_index() {
    let pipeline = Arc::new(Pipeline::new(&PipelineConfig::default()).expect("pipeline"));
    let index = Arc::new(ReferenceIndex::from_direct_entries([
        ("Fever", "Hot."),
        ("Headache", "Pain."),
    ]));
    let bytes = Arc::new(upload("Fever"));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let index = Arc::clone(&index);
            let bytes = Arc::clone(&bytes);
            thread::spawn(move || decode_document(&bytes, &pipeline, &index).expect("decode"))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let first = &results[0];
    assert_eq!(first.matched, vec!["Fever", "Head ache"]);
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(first, result, "Thread {i} produced a different result");
    }
}

#[test]
fn snapshot_swap_does_not_disturb_readers() {
    let pipeline = Arc::new(Pipeline::new(&PipelineConfig::default()).expect("pipeline"));
    let slot = Arc::new(RwLock::new(Arc::new(ReferenceIndex::from_direct_entries([(
        "Fever", "old",
    )]))));
    let bytes = Arc::new(upload("Fever"));

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let slot = Arc::clone(&slot);
            let bytes = Arc::clone(&bytes);
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..20 {
                    let snapshot = Arc::clone(&*slot.read().expect("lock"));
                    let result = decode_document(&bytes, &pipeline, &snapshot).expect("decode");
                    seen.push(result.report_markdown);
                }
                seen
            })
        })
        .collect();

    {
        let fresh = Arc::new(ReferenceIndex::from_direct_entries([("Fever", "new")]));
        *slot.write().expect("lock") = fresh;
    }

    for reader in readers {
        for report in reader.join().expect("thread panicked") {
            assert!(
                report == "### Fever\nold" || report == "### Fever\nnew",
                "unexpected report {report:?}"
            );
        }
    }
}
