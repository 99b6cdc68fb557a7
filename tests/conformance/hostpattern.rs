use ychaos::{HostPattern, Hostname};

fn expand(pattern: &str) -> Vec<String> {
    HostPattern::parse(pattern)
        .expect("pattern should parse")
        .iter()
        .map(|h| h.expect("expanded hostname should be valid").into_string())
        .collect()
}

#[test]
fn expands_zero_padded_range_in_order() {
    assert_eq!(
        expand("host[01-03].example.com"),
        vec!["host01.example.com", "host02.example.com", "host03.example.com"]
    );
}

#[test]
fn padding_follows_start_digit_count() {
    assert_eq!(
        expand("host[08-10].example.com"),
        vec!["host08.example.com", "host09.example.com", "host10.example.com"]
    );
    assert_eq!(
        expand("node[001-3].example.com"),
        vec!["node001.example.com", "node002.example.com", "node003.example.com"]
    );

    let unpadded = expand("h[1-10].example.com");
    assert_eq!(unpadded.len(), 10);
    assert_eq!(unpadded[0], "h1.example.com");
    assert_eq!(unpadded[9], "h10.example.com");
}

#[test]
fn preserves_literal_text_around_marker() {
    assert_eq!(
        expand("[1-2].rack-a.example.com"),
        vec!["1.rack-a.example.com", "2.rack-a.example.com"]
    );
    assert_eq!(expand("db-[7-7]-west"), vec!["db-7-west"]);
}

#[test]
fn reversed_range_expands_to_nothing() {
    let pattern = HostPattern::parse("host[05-01].example.com").expect("reversed range is accepted");
    assert!(pattern.is_range());
    assert!(pattern.is_empty());
    assert_eq!(pattern.iter().count(), 0);
}

#[test]
fn literal_pattern_yields_itself() {
    let pattern = HostPattern::parse("plain.example.com").unwrap();
    assert!(!pattern.is_range());
    assert_eq!(pattern.len(), 1);
    let hosts: Vec<Hostname> = pattern.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(hosts, vec![Hostname::new("plain.example.com").unwrap()]);
}

#[test]
fn literal_pattern_must_be_a_hostname() {
    let err = HostPattern::parse("bad_host.example.com").unwrap_err();
    assert_eq!(err.pattern, "bad_host.example.com");
}

#[test]
fn second_range_is_not_supported() {
    assert!(HostPattern::parse("host[1-2]-[3-4].example.com").is_err());
}

#[test]
fn malformed_markers_are_literal_text() {
    for pattern in ["host[a-b].example.com", "host[1-].example.com", "host[1:3].example.com"] {
        assert!(
            HostPattern::parse(pattern).is_err(),
            "'{}' should be rejected",
            pattern
        );
    }
}

#[test]
fn oversized_bound_is_rejected() {
    let err = HostPattern::parse("h[1-99999999999999999999].example.com").unwrap_err();
    assert!(err.reason.contains("too large"), "unexpected reason: {}", err.reason);
}

#[test]
fn range_growing_past_label_limit_fails_eagerly() {
    // a61 + "1" fits in a label, a61 + "100" does not.
    let pattern = format!("{}[1-100].example.com", "a".repeat(61));
    assert!(HostPattern::parse(&pattern).is_err());

    let fits = format!("{}[1-99].example.com", "a".repeat(61));
    assert_eq!(HostPattern::parse(&fits).unwrap().len(), 99);
}

#[test]
fn expansion_is_restartable() {
    let pattern = HostPattern::parse("web[1-3].example.com").unwrap();
    let first: Vec<_> = pattern.iter().collect();
    let second: Vec<_> = pattern.iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn deserializes_through_serde() {
    let pattern: HostPattern = serde_json::from_value(serde_json::json!("web[1-2].example.com")).unwrap();
    assert_eq!(pattern.as_str(), "web[1-2].example.com");
    assert_eq!(pattern.to_string(), "web[1-2].example.com");
    assert!(serde_json::from_value::<HostPattern>(serde_json::json!("web[1-2]_x")).is_err());
}
