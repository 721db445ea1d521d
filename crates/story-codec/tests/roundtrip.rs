use proptest::prelude::*;
use story_codec::{parse, serialize, Document};
use story_model::{normalize_category, Story};

fn description() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.']{0,40}[A-Za-z0-9.]"
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Z][a-z]{0,10}",
        "[A-Z][a-z]{0,6} [A-Z][a-z]{0,6}",
    ]
}

fn summary() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z][A-Za-z ]{0,30}[A-Za-z.]"]
}

fn document() -> impl Strategy<Value = Document> {
    (
        prop::collection::btree_map("k[a-z_]{0,7}", "v[a-z ]{0,7}[a-z]", 0..4),
        summary(),
        prop::collection::vec((description(), category()), 0..12),
    )
        .prop_map(|(meta, summary, records)| {
            let mut doc = Document::new()
                .with_summary(summary)
                .with_records(records.iter().map(|(d, c)| Story::new(d.as_str(), c)).collect());
            for (k, v) in meta {
                doc.set_metadata_str(k, v);
            }
            doc
        })
}

fn sorted_pairs(doc: &Document) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = doc
        .records
        .iter()
        .map(|s| (normalize_category(&s.category), s.description.clone()))
        .collect();
    pairs.sort();
    pairs
}

proptest! {
    #[test]
    fn parse_keeps_story_multiset(doc in document()) {
        let parsed = parse(&serialize(&doc).unwrap()).unwrap();
        prop_assert_eq!(sorted_pairs(&parsed), sorted_pairs(&doc));
        prop_assert_eq!(parsed.summary, doc.summary.trim());
        prop_assert_eq!(parsed.metadata, doc.metadata);
    }

    #[test]
    fn serialize_is_a_fixed_point(doc in document()) {
        let first = serialize(&doc).unwrap();
        let second = serialize(&parse(&first).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parsed_groups_come_out_sorted(doc in document()) {
        let parsed = parse(&serialize(&doc).unwrap()).unwrap();
        let categories: Vec<_> = parsed.records.iter().map(|s| s.category.clone()).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        prop_assert_eq!(categories, sorted);
    }

    #[test]
    fn output_ignores_input_order(doc in document()) {
        let mut reversed = doc.clone();
        reversed.records.reverse();
        let a = parse(&serialize(&doc).unwrap()).unwrap();
        let b = parse(&serialize(&reversed).unwrap()).unwrap();
        prop_assert_eq!(sorted_pairs(&a), sorted_pairs(&b));
    }
}
