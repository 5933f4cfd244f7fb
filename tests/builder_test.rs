//! Tests for TreeBuilder

use docktree::domain::{DomainError, RawLayer, TreeBuilder, UNTAGGED_SENTINEL};
use docktree::util::testing::{layer_id, record, three_layer_chain};

#[test]
fn given_chain_when_building_then_links_every_record_to_its_parent() {
    // Arrange
    let records = three_layer_chain();

    // Act
    let tree = TreeBuilder::new().build(&records).unwrap();

    // Assert
    assert_eq!(tree.len(), 3);
    for record in &records {
        let idx = tree.index_of(&record.id).unwrap();
        let node = tree.get(idx).unwrap();
        if record.parent_id.is_empty() {
            assert!(node.is_head());
            continue;
        }
        let parent_idx = tree.index_of(&record.parent_id).unwrap();
        assert_eq!(node.parent(), Some(parent_idx));
        let siblings = tree.get(parent_idx).unwrap().children();
        assert_eq!(siblings.iter().filter(|&&c| c == idx).count(), 1);
    }
}

#[test]
fn given_children_before_parents_when_building_then_still_links() {
    // Arrange
    let mut records = three_layer_chain();
    records.reverse();

    // Act
    let tree = TreeBuilder::new().build(&records).unwrap();

    // Assert
    let app = tree.by_id(&layer_id("app")).unwrap();
    assert_eq!(app.parent(), tree.index_of(&layer_id("mid")));
}

#[test]
fn given_sentinel_tags_when_building_then_layer_is_untagged() {
    let records = vec![record("dangling", "", &[], 5)];

    let tree = TreeBuilder::new().build(&records).unwrap();

    let node = tree.by_id(&layer_id("dangling")).unwrap();
    assert!(node.tags().is_empty());
    assert_eq!(node.size(), 5);
    assert_eq!(records[0].repo_tags, vec![UNTAGGED_SENTINEL.to_string()]);
}

#[test]
fn given_several_tags_when_building_then_keeps_their_order() {
    let records = vec![record("multi", "", &["b:2", "a:1"], 0)];

    let tree = TreeBuilder::new().build(&records).unwrap();

    let node = tree.by_id(&layer_id("multi")).unwrap();
    assert_eq!(node.tags(), ["b:2".to_string(), "a:1".to_string()]);
}

#[test]
fn given_siblings_when_building_then_children_follow_record_order() {
    let records = vec![
        record("root", "", &["root"], 0),
        record("second", "root", &["second"], 0),
        record("first", "root", &["first"], 0),
    ];

    let tree = TreeBuilder::new().build(&records).unwrap();

    let root = tree.by_id(&layer_id("root")).unwrap();
    let ids: Vec<&str> = root
        .children()
        .iter()
        .map(|&c| tree.get(c).unwrap().identifier())
        .collect();
    assert_eq!(ids, vec![layer_id("second"), layer_id("first")]);
}

#[test]
fn given_missing_parent_when_building_then_errors() {
    // Arrange
    let records = vec![record("orphan", "ghost", &["orphan"], 0)];

    // Act
    let result = TreeBuilder::new().build(&records);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::MissingParent {
            layer: layer_id("orphan"),
            parent: layer_id("ghost"),
        }
    );
}

#[test]
fn given_record_without_identifier_when_building_then_errors() {
    let records = vec![RawLayer::new("", "")];

    let result = TreeBuilder::new().build(&records);

    assert_eq!(result.unwrap_err(), DomainError::MissingIdentifier);
}

#[test]
fn given_no_records_when_building_then_tree_is_empty() {
    let tree = TreeBuilder::new().build(&[]).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn given_repeated_record_when_building_then_child_is_linked_once() {
    let records = vec![
        record("a", "", &["a"], 0),
        record("b", "a", &["b"], 1),
        record("b", "a", &["b"], 2),
    ];

    let tree = TreeBuilder::new().build(&records).unwrap();

    assert_eq!(tree.len(), 2);
    let a = tree.by_id(&layer_id("a")).unwrap();
    assert_eq!(a.children().len(), 1);
    assert_eq!(Some(a.children()[0]), tree.index_of(&layer_id("b")));
    assert_eq!(tree.by_id(&layer_id("b")).unwrap().size(), 2);
}

#[test]
fn given_repeated_record_with_new_parent_when_building_then_last_parent_wins() {
    let records = vec![
        record("a", "", &["a"], 0),
        record("c", "", &["c"], 0),
        record("b", "a", &["b"], 0),
        record("b", "c", &["b"], 0),
    ];

    let tree = TreeBuilder::new().build(&records).unwrap();

    let b = tree.by_id(&layer_id("b")).unwrap();
    assert_eq!(b.parent(), tree.index_of(&layer_id("c")));
    assert!(tree.by_id(&layer_id("a")).unwrap().children().is_empty());
}
