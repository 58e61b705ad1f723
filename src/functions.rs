// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! CloudFormation intrinsic functions.
//!
//! Each constructor checks its arguments and returns a plain single-key map,
//! such as `{"Fn::Join": [..]}` or `{"Ref": ..}`, ready to be stored anywhere
//! a value is expected.


use crate::{
    error::IntrinsicError,
    value::{Map, Value},
};

const MIN_CONDITIONS: usize = 2;
const MAX_CONDITIONS: usize = 10;

fn function(key: &str, payload: impl Into<Value>) -> Map {
    let mut map = Map::new();
    map.insert(key.to_string(), payload.into());
    map
}

/// `Fn::Base64`.
pub fn base64(value: impl Into<Value>) -> Map {
    function("Fn::Base64", value)
}

/// `Fn::FindInMap`: the value under `key` then `value` in the mapping `map_name`.
pub fn find_in_map(map_name: impl Into<Value>, key: impl Into<Value>, value: impl Into<Value>) -> Map {
    function("Fn::FindInMap", vec![map_name.into(), key.into(), value.into()])
}

/// `Fn::GetAtt`.
pub fn get_att(logical_name: impl Into<Value>, attribute: impl Into<Value>) -> Map {
    function("Fn::GetAtt", vec![logical_name.into(), attribute.into()])
}

/// `Fn::GetAZs`. An empty region means the stack's own region.
pub fn get_azs(region: impl Into<Value>) -> Map {
    function("Fn::GetAZs", region)
}

/// `Fn::GetAZs` for the region the stack is created in.
pub fn get_azs_current() -> Map {
    get_azs("")
}

/// `Fn::Join`. At least two parts are required.
pub fn join<I, V>(separator: impl Into<Value>, parts: I) -> Result<Map, IntrinsicError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let parts: Vec<Value> = parts.into_iter().map(Into::into).collect();
    if parts.len() < 2 {
        return Err(IntrinsicError::JoinNeedsInput);
    }
    Ok(join_parts(separator.into(), parts))
}

// Builds the join payload without checking the part count.
pub(crate) fn join_parts(separator: Value, parts: Vec<Value>) -> Map {
    function("Fn::Join", vec![separator, Value::List(parts)])
}

/// `Fn::Select`.
///
/// `index` must be coercible to a non-negative integer within range of
/// `choices`, and no choice may be null. The checks run in that order and
/// each has its own error.
pub fn select<I, V>(index: impl Into<Value>, choices: I) -> Result<Map, IntrinsicError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let index = coerce_index(&index.into()).ok_or(IntrinsicError::SelectIndexNotNumeric)?;
    let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();

    if choices.is_empty() {
        return Err(IntrinsicError::SelectEmpty);
    }
    if choices.iter().any(Value::is_null) {
        return Err(IntrinsicError::SelectNull);
    }
    if index < 0 || index as u64 >= choices.len() as u64 {
        return Err(IntrinsicError::SelectIndexOutOfRange);
    }

    Ok(function("Fn::Select", vec![Value::from(index), Value::List(choices)]))
}

fn coerce_index(index: &Value) -> Option<i64> {
    match index {
        Value::Number(number) => match number.as_i64() {
            Some(index) => Some(index),
            // Too large for i64 is certainly out of range.
            None if number.is_u64() => Some(i64::MAX),
            None => number.as_f64().map(|index| index.trunc() as i64),
        },
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

/// `Ref`.
pub fn ref_(logical_name: impl Into<Value>) -> Map {
    function("Ref", logical_name)
}

/// A reference to a named condition, `{"Condition": name}`.
pub fn c_ref(condition_name: impl Into<Value>) -> Map {
    function("Condition", condition_name)
}

fn check_condition_count(function: &'static str, count: usize) -> Result<(), IntrinsicError> {
    if count < MIN_CONDITIONS {
        Err(IntrinsicError::TooFewConditions { function })
    } else if count > MAX_CONDITIONS {
        Err(IntrinsicError::TooManyConditions { function })
    } else {
        Ok(())
    }
}

/// `Fn::And` over 2 to 10 conditions.
pub fn c_and<I, V>(conditions: I) -> Result<Map, IntrinsicError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let conditions: Vec<Value> = conditions.into_iter().map(Into::into).collect();
    check_condition_count("c_and", conditions.len())?;
    Ok(function("Fn::And", conditions))
}

/// `Fn::Or` over 2 to 10 conditions.
pub fn c_or<I, V>(conditions: I) -> Result<Map, IntrinsicError>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let conditions: Vec<Value> = conditions.into_iter().map(Into::into).collect();
    check_condition_count("c_or", conditions.len())?;
    Ok(function("Fn::Or", conditions))
}

pub fn c_not(condition: impl Into<Value>) -> Map {
    function("Fn::Not", vec![condition.into()])
}

pub fn c_equals(first: impl Into<Value>, second: impl Into<Value>) -> Map {
    function("Fn::Equals", vec![first.into(), second.into()])
}

/// `Fn::If`: `if_true` when the named condition holds, else `if_false`.
pub fn c_if(condition_name: impl Into<Value>, if_true: impl Into<Value>, if_false: impl Into<Value>) -> Map {
    function("Fn::If", vec![condition_name.into(), if_true.into(), if_false.into()])
}
