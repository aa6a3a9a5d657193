mod common;

use flowgen::client::filter_catalog;

#[test]
fn test_filter_matches_display_name_and_description() {
    let catalog = common::catalog();

    let by_name: Vec<&str> = filter_catalog(&catalog, "slack").iter().map(|e| e.name.as_str()).collect();
    assert_eq!(by_name, vec!["n8n-nodes-base.slack"]);

    let by_description: Vec<&str> = filter_catalog(&catalog, "RESPONSE DATA").iter().map(|e| e.name.as_str()).collect();
    assert_eq!(by_description, vec!["n8n-nodes-base.httpRequest"]);
}

#[test]
fn test_blank_query_returns_everything() {
    let catalog = common::catalog();
    assert_eq!(filter_catalog(&catalog, "").len(), catalog.len());
    assert_eq!(filter_catalog(&catalog, "   ").len(), catalog.len());
    assert!(filter_catalog(&catalog, "kafka").is_empty());
}
