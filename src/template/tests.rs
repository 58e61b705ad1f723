use super::*;

#[test]
fn has_version_and_sections() {
    let template = Template::new(Some("Test"));
    assert_eq!(template.get("AWSTemplateFormatVersion"), Some(Value::from("2010-09-09")));
    assert_eq!(template.get("Description"), Some(Value::from("Test")));

    for section in Section::ALL {
        let node = template.section(section);
        assert_eq!(node.kind(), section.kind());
        assert!(template.contains_key(&node.name()));
        assert!(template.slot(section.slot_name()).unwrap().ptr_eq(&node));
    }

    assert_eq!(
        template.keys(),
        vec![
            "AWSTemplateFormatVersion",
            "Description",
            "Parameters",
            "Mappings",
            "Conditions",
            "Resources",
            "Outputs",
            "Metadata",
        ]
    );
}

#[test]
fn no_description() {
    let template = Template::new(None);
    assert!(!template.contains_key("Description"));
    assert_eq!(
        template.render().unwrap(),
        "{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\"\n}"
    );
}

#[test]
fn render_leaves_out_empty_sections() {
    let template = Template::new(Some("This is a test"));
    template.parameters().update([("These", "are awesome!")]);

    let expected = r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Description": "This is a test",
  "Parameters": {
    "These": "are awesome!"
  }
}"#;
    assert_eq!(template.render().unwrap(), expected);
    assert_eq!(template.to_string(), expected);
}

#[test]
fn render_does_not_modify_the_template() {
    let template = Template::new(Some("Test"));
    template.outputs().insert("Out", "value");

    let first = template.render().unwrap();
    let second = template.render().unwrap();
    assert_eq!(first, second);

    // Empty sections are still bound and usable after a render.
    assert!(template.slot("resources").is_some());
    template.resources().insert("Late", "addition");
    assert!(template.render().unwrap().contains("\"Resources\""));
}

#[test]
fn sections_render_in_fixed_order() {
    let template = Template::new(None);
    template.metadata().insert("M", 1);
    template.outputs().insert("O", 2);
    template.parameters().insert("P", 3);

    let expected = r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Parameters": {
    "P": 3
  },
  "Outputs": {
    "O": 2
  },
  "Metadata": {
    "M": 1
  }
}"#;
    assert_eq!(template.render().unwrap(), expected);
}

#[test]
fn prune_unbinds_empty_sections() {
    let template = Template::new(Some("Test"));
    let resources = template.resources();
    resources.insert("Thing", "here");

    let pruned = template.prune();
    assert_eq!(pruned, vec!["parameters", "mappings", "conditions", "outputs", "metadata"]);
    assert_eq!(
        template.keys(),
        vec!["AWSTemplateFormatVersion", "Description", "Resources"]
    );
    assert!(template.slot("parameters").is_none());
    assert!(template.slot("resources").unwrap().ptr_eq(&resources));

    // Nothing left to prune.
    assert!(template.prune().is_empty());
}

#[test]
fn accessor_rebinds_pruned_section() {
    let template = Template::new(None);
    template.prune();
    assert!(template.slot("outputs").is_none());

    let outputs = template.outputs();
    assert!(template.slot("outputs").unwrap().ptr_eq(&outputs));
    assert!(template.contains_key("Outputs"));
    assert!(template.outputs().ptr_eq(&outputs));
}

#[test]
fn rebound_section_keeps_its_place() {
    let template = Template::new(None);
    template.resources().insert("R", 1);
    template.prune();
    template.parameters().insert("P", 2);

    assert_eq!(template.keys(), vec!["AWSTemplateFormatVersion", "Parameters", "Resources"]);
    let expected = r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Parameters": {
    "P": 2
  },
  "Resources": {
    "R": 1
  }
}"#;
    assert_eq!(template.render().unwrap(), expected);
}

#[test]
fn empty_description_is_left_out() {
    let template = Template::new(Some(""));
    assert!(!template.contains_key("Description"));
    assert_eq!(
        template.render().unwrap(),
        "{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\"\n}"
    );
}

#[test]
fn to_json_prunes_like_render() {
    let template = Template::new(Some("d"));
    let json = template.to_json().unwrap();
    assert_eq!(json, "{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\",\n  \"Description\": \"d\"\n}");
    assert_eq!(json, template.render().unwrap());
    assert!(!json.contains("{}"));
}

#[test]
fn only_template_roots_are_wrapped() {
    let template = Template::new(None);
    assert!(Template::from_root(template.root().clone()).is_some());
    assert!(Template::from_root(Node::new(NodeKind::Resources)).is_none());
}
