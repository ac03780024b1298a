use canonical::{canonical_key, CanonicalKey};

fn main() {
    let labels = [
        "  Fever (38C+) ",
        "Head\u{00A0}ACHE",
        "Боль в горле (острая)",
        "Symptom [KD-001]",
    ];

    for label in labels {
        println!("{label:?} -> {:?}", canonical_key(label));
    }

    let key = CanonicalKey::from_label("  Sore   THROAT ");
    println!();
    println!("key: {key}");
}
