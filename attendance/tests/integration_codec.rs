//! Integration tests for the persisted text format.

use attendance::codec::{decode, encode};
use attendance::store::{Store, StudentId};

/// Builds a store from a deterministic pseudo-random sequence of marks.
fn generated_store(seed: u64, marks: usize) -> Store {
    let mut state = seed;
    let mut store = Store::new();

    for _ in 0..marks {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;

        let roll_no = StudentId((state % 40) as i64 - 5);
        let day = (state >> 8) % 28 + 1;
        let month = (state >> 16) % 12 + 1;
        let date = format!("2025-{month:02}-{day:02}");
        let _ = store.mark(roll_no, &date);
    }
    store
}

#[test]
fn test_marks_keep_dates_sorted_and_unique() {
    for seed in [1, 7, 42, 1_000_003] {
        let store = generated_store(seed, 500);

        for (roll_no, dates) in store.iter() {
            assert!(
                dates.windows(2).all(|w| w[0] < w[1]),
                "dates for {roll_no} not strictly ascending: {dates:?}"
            );
        }
    }
}

#[test]
fn test_round_trip_generated_stores() {
    for seed in [3, 99, 2024, 65_537] {
        let store = generated_store(seed, 300);
        let text = encode(&store);

        let decoded = decode(&text).unwrap().unwrap();
        assert_eq!(decoded, store, "seed {seed}");
        assert_eq!(encode(&decoded), text, "seed {seed}");
        assert_eq!(decoded.stats(), store.stats());
    }
}

#[test]
fn test_decode_reads_original_layout() {
    // Spacing as written by hand, keys quoted.
    let text = r#"{"101":["2025-07-01", "2025-07-02"], "102":["2025-07-01"]}"#;
    let store = decode(text).unwrap().unwrap();

    let stats = store.stats();
    assert_eq!(stats.total_students, 2);
    assert_eq!(stats.total_unique_dates, 2);
    assert_eq!(stats.total_attendance_entries, 3);
    assert_eq!(
        encode(&store),
        r#"{"101":["2025-07-01","2025-07-02"],"102":["2025-07-01"]}"#
    );
}

#[test]
fn test_decode_empty_versus_invalid() {
    assert!(decode("").unwrap().is_none());
    assert!(decode("{invalid").is_err());
    assert!(decode("{").is_err());
    assert!(decode("}").is_err());
    assert!(decode("[]").is_err());
}
