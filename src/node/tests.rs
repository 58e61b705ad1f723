use serde_json::json;
use tracing_test::traced_test;

use super::*;
use crate::values;

fn test_resource(entries: serde_json::Value) -> Node {
    let node = Node::new(NodeKind::custom("TestResource"));
    if let Value::Map(map) = Value::from(entries) {
        node.update(map);
    }
    node
}

#[test]
fn add_child_at_any_time() {
    // Children can be added before or after their parent is attached.
    let root = Node::new(NodeKind::Node);
    let tr1 = test_resource(json!({"Id": 1}));
    let tr2 = test_resource(json!({"Id": 2}));

    let added = root.add(&tr1);
    assert!(added.ptr_eq(&tr1));

    tr1.add(&tr2);
    let child = root.get("TestResource").unwrap();
    assert_eq!(child.get("Id"), Some(Value::from(1)));
    assert_eq!(child.get("TestResource").unwrap().get("Id"), Some(Value::from(2)));

    // Later changes to the grandchild are visible through the root.
    tr2.insert("This Is", "A Test");
    let grandchild = root.get("TestResource").unwrap().get("TestResource").unwrap();
    assert_eq!(grandchild.get("This Is"), Some(Value::from("A Test")));
}

#[test]
fn constructor_entries() {
    let root = Node::new(NodeKind::Node);
    root.add(&test_resource(json!({"Test": "A custom constructed dict"})));
    assert_eq!(
        root.get("TestResource"),
        Some(Value::from(json!({"Test": "A custom constructed dict"})))
    );
}

#[test]
fn naming() {
    let node = Node::named(NodeKind::custom("TestResource"), "NormalName");
    assert_eq!(node.name(), "NormalName");

    node.set_name("DifferentName");
    assert_eq!(node.name(), "DifferentName");

    node.clear_name();
    assert_eq!(node.name(), "TestResource");
}

#[test]
fn default_names() {
    assert_eq!(Node::new(NodeKind::Node).name(), "Node");
    assert_eq!(Node::new(NodeKind::Properties).name(), "Properties");
    assert_eq!(Node::new(NodeKind::UpdatePolicy).name(), "UpdatePolicy");
    assert_eq!(NodeKind::Template.to_string(), "CloudFormationTemplate");
}

#[test]
fn bind_and_unbind() {
    let root = Node::new(NodeKind::Node);
    assert!(!root.contains_key("TestResource"));

    let node = test_resource(json!({}));
    root.bind("test_resource", &node);
    assert!(root.contains_key("TestResource"));
    assert!(root.get("TestResource").unwrap().as_node().unwrap().ptr_eq(&node));
    assert!(root.slot("test_resource").unwrap().ptr_eq(&node));

    let unbound = root.unbind("test_resource").unwrap();
    assert!(unbound.ptr_eq(&node));
    assert!(!root.contains_key("TestResource"));
    assert!(root.slot("test_resource").is_none());
    assert!(root.is_empty());
}

#[test]
fn rebind_displaces_previous_node() {
    let root = Node::new(NodeKind::Node);
    let x = Node::named(NodeKind::Node, "X");
    let y = Node::named(NodeKind::Node, "Y");

    root.bind("field", &x);
    root.bind("field", &y);

    assert!(!root.contains_key("X"));
    assert!(root.get("Y").unwrap().as_node().unwrap().ptr_eq(&y));
    assert_eq!(root.keys(), vec!["Y"]);

    root.unbind("field");
    assert!(root.is_empty());
}

#[test]
fn rebind_same_node_keeps_position() {
    let root = Node::new(NodeKind::Node);
    let x = Node::named(NodeKind::Node, "X");
    root.bind("x", &x);
    root.insert("after", 1);
    root.bind("x", &x);
    assert_eq!(root.keys(), vec!["X", "after"]);
}

#[test]
fn insertion_order() {
    let node = Node::from_entries(NodeKind::Node, [("c", 1), ("a", 2), ("b", 3)]);
    assert_eq!(node.keys(), vec!["c", "a", "b"]);

    // Updating a key does not move it.
    node.insert("a", 20);
    assert_eq!(node.keys(), vec!["c", "a", "b"]);
    assert_eq!(node.get("a"), Some(Value::from(20)));

    // Removing and re-inserting appends.
    node.remove_key("c");
    node.insert("c", 10);
    assert_eq!(node.keys(), vec!["a", "b", "c"]);

    let expected = "{\n  \"a\": 20,\n  \"b\": 3,\n  \"c\": 10\n}";
    assert_eq!(node.to_json().unwrap(), expected);
}

#[test]
fn non_node_children_are_rejected() {
    let root = Node::new(NodeKind::Node);

    let err = root.add_value("not a node").unwrap_err();
    assert!(matches!(err, Error::InvalidChild { op: ChildOp::Add }));
    assert_eq!(
        err.to_string(),
        "invalid child type for add: only nodes can be added or removed"
    );

    let err = root.remove_value(&Value::from(42)).unwrap_err();
    assert!(matches!(err, Error::InvalidChild { op: ChildOp::Remove }));

    let child = Node::new(NodeKind::Properties);
    let added = root.add_value(&child).unwrap();
    assert!(added.ptr_eq(&child));
    assert!(root.remove_value(&Value::from(&child)).unwrap().is_some());
}

#[test]
#[traced_test]
fn removing_missing_child_is_tolerated() {
    let root = Node::new(NodeKind::Node);
    let child = Node::named(NodeKind::Node, "Child");
    root.add(&child);

    // A rename leaves the old key behind.
    child.set_name("Renamed");
    assert!(root.remove(&child).is_none());
    assert!(root.contains_key("Child"));
    assert!(logs_contain("child node not present, nothing to remove"));

    child.set_name("Child");
    assert!(root.remove(&child).is_some());
    assert!(root.remove(&child).is_none());
}

#[test]
fn nested_render() {
    let root = Node::new(NodeKind::Node);
    let child = Node::named(NodeKind::Node, "Child");
    child.insert("List", values!["a", 1, true, Value::Null]);
    child.insert("Empty", Map::new());
    root.insert("First", "value");
    root.add(&child);

    let expected = r#"{
  "First": "value",
  "Child": {
    "List": [
      "a",
      1,
      true,
      null
    ],
    "Empty": {}
  }
}"#;
    assert_eq!(root.to_json().unwrap(), expected);
    assert_eq!(root.to_string(), expected);
}

#[test]
fn render_escapes_non_ascii() {
    let node = Node::from_entries(NodeKind::Node, [("Greeting", "caf\u{e9} \u{1f600}")]);
    assert_eq!(node.to_json().unwrap(), "{\n  \"Greeting\": \"caf\\u00e9 \\ud83d\\ude00\"\n}");
}

#[test]
fn equality() {
    let left = Node::from_entries(NodeKind::Node, [("a", 1), ("b", 2)]);
    let right = Node::from_entries(NodeKind::Properties, [("a", 1), ("b", 2)]);
    assert_eq!(left, right);
    assert!(!left.ptr_eq(&right));
    assert_eq!(Value::from(&left), Value::from(json!({"a": 1, "b": 2})));

    right.insert("c", 3);
    assert_ne!(left, right);
}
