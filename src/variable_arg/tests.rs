use serde_json::json;

use super::*;
use crate::command;

fn parse(args: &[&str]) -> Result<Vec<VariableArg>, Error> {
    let mut argv = vec!["cfnplate", "input.sh"];
    argv.extend_from_slice(args);
    let matches = command().try_get_matches_from(argv)?;
    variable_args(&matches)
}

#[test]
fn text_and_json_args() {
    let text = VariableArg::parse_text(0, "name=web=1").unwrap();
    assert_eq!(text.name, "name");
    assert_eq!(text.value, Value::from("web=1"));

    let json = VariableArg::parse_json(0, r#"ref={"Ref": "AWS::Region"}"#).unwrap();
    assert_eq!(json.value, Value::from(json!({"Ref": "AWS::Region"})));

    let empty = VariableArg::parse_text(0, "blank=").unwrap();
    assert_eq!(empty.value, Value::from(""));
}

#[test]
fn malformed_args() {
    let err = VariableArg::parse_text(0, "no-equals").unwrap_err();
    assert_eq!(err.to_string(), "variable 'no-equals' must have the form NAME=VALUE");

    assert!(VariableArg::parse_text(0, "=value").is_err());
    assert!(VariableArg::parse_json(0, "port=not json").is_err());
}

#[test]
fn args_keep_command_line_order() {
    let args = parse(&["--var-json", "a=1", "--var", "b=two", "--var-json", "c=[3]", "--var", "a=last"]).unwrap();

    let names: Vec<&str> = args.iter().map(|arg| arg.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "a"]);
    assert_eq!(args[0].value, Value::from(1));
    assert_eq!(args[2].value, Value::from(json!([3])));
    assert_eq!(args[3].value, Value::from("last"));
}

#[test]
fn no_variable_args() {
    assert!(parse(&["--base64"]).unwrap().is_empty());
}
