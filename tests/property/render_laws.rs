//! Property-based tests for renderer laws

use chrono::Utc;
use ctxlog::{
    CompactEncoder, ContextMap, Formatter, MergedRecord, Severity, TreeOptions, TreeRenderer,
};
use proptest::prelude::*;
use regex::Regex;

fn record(message: String, context: ContextMap) -> MergedRecord {
    MergedRecord {
        severity: Severity::Warning,
        timestamp: Utc::now(),
        message,
        source: "prop".to_string(),
        context,
    }
}

fn tree(color: bool) -> TreeRenderer {
    TreeRenderer::new(TreeOptions {
        color,
        ..TreeOptions::default()
    })
}

proptest! {
    /// Removing color codes from colored output yields the uncolored output.
    #[test]
    fn test_color_neutrality(
        message in "[a-zA-Z0-9 _\n]{0,24}",
        text in "[a-zA-Z0-9 _]{0,12}",
        number in any::<i64>(),
        nested in prop::collection::vec(any::<bool>(), 0..4),
    ) {
        let context = ContextMap::new()
            .with("text", text)
            .with("number", number)
            .with("nested", ContextMap::new().with("flags", nested));
        let record = record(message, context);
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let colored = tree(true).render(&record);
        let plain = tree(false).render(&record);
        prop_assert_eq!(ansi.replace_all(&colored, "").into_owned(), plain);
    }

    /// Every primitive scalar survives compact render then parse.
    #[test]
    fn test_compact_scalars_round_trip(
        text in any::<String>(),
        int in any::<i64>(),
        uint in any::<u64>(),
        flag in any::<bool>(),
        float in -1.0e12f64..1.0e12f64,
    ) {
        let context = ContextMap::new()
            .with("text", text.clone())
            .with("int", int)
            .with("uint", uint)
            .with("flag", flag)
            .with("float", float);
        let line = CompactEncoder::new().render(&record("m".to_string(), context));
        prop_assert!(!line.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["text"].as_str(), Some(text.as_str()));
        prop_assert_eq!(parsed["int"].as_i64(), Some(int));
        prop_assert_eq!(parsed["uint"].as_u64(), Some(uint));
        prop_assert_eq!(parsed["flag"].as_bool(), Some(flag));
        prop_assert_eq!(parsed["float"].as_f64(), Some(float));
    }
}
