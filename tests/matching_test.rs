//! End-to-end matching behaviour of compiled automata.

use acism::{Automaton, Match};

fn pairs(automaton: &Automaton, text: &[u8]) -> Vec<(usize, usize)> {
    automaton
        .find_all(text)
        .into_iter()
        .map(|m| (m.pattern, m.end))
        .collect()
}

#[test]
fn test_classic_pattern_set() {
    let automaton = Automaton::new(&["he", "she", "his", "hers"]).unwrap();
    let found = automaton.find_all(b"ahishers");
    assert_eq!(
        found,
        vec![
            Match { pattern: 2, end: 4 },
            Match { pattern: 1, end: 6 },
            Match { pattern: 0, end: 6 },
            Match { pattern: 3, end: 8 },
        ]
    );
}

#[test]
fn test_nested_suffix_matches() {
    let automaton = Automaton::new(&["he", "she", "hers"]).unwrap();
    assert_eq!(pairs(&automaton, b"ushers"), vec![(1, 4), (0, 4), (2, 6)]);
}

#[test]
fn test_suffix_chain_of_three() {
    let automaton = Automaton::new(&["abcd", "bcd", "cd", "d"]).unwrap();
    assert_eq!(
        pairs(&automaton, b"xabcd"),
        vec![(0, 5), (1, 5), (2, 5), (3, 5)]
    );
}

#[test]
fn test_suffix_behind_leaf_pattern() {
    let automaton = Automaton::new(&["aa", "a", "baab"]).unwrap();
    assert_eq!(
        pairs(&automaton, b"baaa"),
        vec![(1, 2), (0, 3), (1, 3), (0, 4), (1, 4)]
    );
    assert_eq!(
        pairs(&automaton, b"baab"),
        vec![(1, 2), (0, 3), (1, 3), (2, 4)]
    );
}

#[test]
fn test_prefix_patterns() {
    let automaton = Automaton::new(&["a", "ab", "abc"]).unwrap();
    assert_eq!(pairs(&automaton, b"abc"), vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_overlapping_repeats() {
    let automaton = Automaton::new(&["aba"]).unwrap();
    assert_eq!(pairs(&automaton, b"ababa"), vec![(0, 3), (0, 5)]);
}

#[test]
fn test_byte_outside_alphabet_breaks_match() {
    let automaton = Automaton::new(&["abc"]).unwrap();
    assert!(automaton.find_all(b"abXc").is_empty());
    assert!(!automaton.is_match(b"abXc"));
    assert_eq!(pairs(&automaton, b"abcXabc"), vec![(0, 3), (0, 7)]);
}

#[test]
fn test_embedded_zero_bytes() {
    let patterns: [&[u8]; 3] = [b"\0", b"a\0b", b"\0\0"];
    let automaton = Automaton::new(&patterns).unwrap();
    assert_eq!(
        pairs(&automaton, b"a\0b\0\0"),
        vec![(0, 2), (1, 3), (0, 4), (2, 5), (0, 5)]
    );
}

#[test]
fn test_high_bytes() {
    let patterns: [&[u8]; 2] = [b"\xff\xfe", b"\xfe"];
    let automaton = Automaton::new(&patterns).unwrap();
    assert_eq!(
        pairs(&automaton, b"\xff\xfe\xfe"),
        vec![(0, 2), (1, 2), (1, 3)]
    );
}

#[test]
fn test_duplicate_patterns_report_first_index() {
    let automaton = Automaton::new(&["abc", "b", "abc"]).unwrap();
    assert_eq!(pairs(&automaton, b"abc"), vec![(1, 2), (0, 3)]);
    assert_eq!(automaton.stats().duplicate_patterns, 1);
}

#[test]
fn test_empty_patterns_never_match() {
    let automaton = Automaton::new(&["", "x", ""]).unwrap();
    assert_eq!(pairs(&automaton, b"axa"), vec![(1, 2)]);
    assert_eq!(automaton.stats().empty_patterns, 2);
}

#[test]
fn test_empty_pattern_list() {
    let patterns: [&str; 0] = [];
    let automaton = Automaton::new(&patterns).unwrap();
    assert!(automaton.find_all(b"").is_empty());
    assert!(automaton.find_all(b"some text").is_empty());
    assert_eq!(automaton.count_matches(&[0u8; 64]), 0);
}

#[test]
fn test_empty_text() {
    let automaton = Automaton::new(&["a"]).unwrap();
    assert!(automaton.find_all(b"").is_empty());
}

#[test]
fn test_single_byte_alphabet() {
    let automaton = Automaton::new(&["a"]).unwrap();
    assert_eq!(automaton.count_matches(&[b'a'; 100]), 100);
}

#[test]
fn test_all_byte_values() {
    let patterns: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
    let automaton = Automaton::new(&patterns).unwrap();
    let text: Vec<u8> = (0..=255u8).rev().collect();
    let found = automaton.find_all(&text);
    assert_eq!(found.len(), 256);
    for (i, m) in found.iter().enumerate() {
        assert_eq!(m.pattern, 255 - i);
        assert_eq!(m.end, i + 1);
    }
}

#[test]
fn test_long_pattern() {
    let pattern = "x".repeat(10_000) + "y";
    let automaton = Automaton::new(&[pattern.as_str(), "xy"]).unwrap();
    let text = "x".repeat(20_000) + "y";
    assert_eq!(
        pairs(&automaton, text.as_bytes()),
        vec![(0, 20_001), (1, 20_001)]
    );
}

#[test]
fn test_large_generated_set() {
    let patterns: Vec<String> = (0..5_000).map(|i| format!("<{i}>")).collect();
    let automaton = Automaton::new(&patterns).unwrap();
    assert_eq!(automaton.pattern_count(), 5_000);

    let text = "..<42>..<4999>..<5000>..";
    assert_eq!(
        pairs(&automaton, text.as_bytes()),
        vec![(42, 6), (4999, 14)]
    );
}

#[test]
fn test_identical_compilation() {
    let patterns = ["he", "she", "his", "hers", "hershey", "shy"];
    let first = Automaton::new(&patterns).unwrap();
    let second = Automaton::new(&patterns).unwrap();
    assert_eq!(first.table_size(), second.table_size());
    assert_eq!(first.stats(), second.stats());

    let text = b"she sells hershey bars to shy hers";
    assert_eq!(first.find_all(text), second.find_all(text));
}

#[test]
fn test_shared_across_threads() {
    let automaton = std::sync::Arc::new(Automaton::new(&["he", "she", "his", "hers"]).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let automaton = automaton.clone();
            std::thread::spawn(move || automaton.count_matches(b"ahishers ushers"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 7);
    }
}
