use std::fmt::Display;

use bp_core::collections::ConcurrentMap;
use bp_core::{Blueprint, Error, ExpressionEvaluator, Result, Ty, TypeCoercer, Value};

fn conversion_error(value: &Value, target: &Ty, reason: impl Display) -> Error {
    Error::Conversion {
        value: value.to_string(),
        target: target.clone(),
        reason: reason.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Int(_) | Value::Decimal(_) | Value::Bool(_) | Value::Char(_)
    )
}

/// Replaces `${key}` placeholders. A text that is exactly one placeholder
/// evaluates to the placeholder's value, keeping its type.
#[derive(Default)]
pub struct PlaceholderEvaluator {
    placeholders: ConcurrentMap<String, Value>,
}

impl PlaceholderEvaluator {
    pub fn define(&self, key: &str, value: Value) {
        self.placeholders.insert(key.to_string(), value);
    }

    fn lookup(&self, key: &str, text: &str) -> Result<Value> {
        self.placeholders
            .get_cloned(&key.to_string())
            .ok_or_else(|| Error::Expression {
                expression: text.to_string(),
                reason: format!("unknown placeholder '{}'", key),
            })
    }
}

impl ExpressionEvaluator for PlaceholderEvaluator {
    fn evaluate(&self, text: &str, _blueprint: &Blueprint) -> Result<Value> {
        if !text.contains("${") {
            return Ok(Value::string(text));
        }
        if let Some(key) = text.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            if !key.contains("${") && !key.contains('}') {
                return self.lookup(key, text);
            }
        }
        let mut out = String::new();
        let mut rest = text;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                return Err(Error::Expression {
                    expression: text.to_string(),
                    reason: "unterminated placeholder".to_string(),
                });
            };
            out.push_str(&self.lookup(&after[..end], text)?.to_string());
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(Value::String(out))
    }
}

#[derive(Default)]
pub struct ScalarCoercer;

impl TypeCoercer for ScalarCoercer {
    fn coerce(&self, value: Value, target: &Ty) -> Result<Value> {
        match (target, value) {
            (Ty::Any, value) => Ok(value),
            (target, Value::Null) if target.is_primitive() => {
                Err(conversion_error(&Value::Null, target, "null is not a primitive"))
            }
            (_, Value::Null) => Ok(Value::Null),
            (Ty::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (Ty::Int, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|err| conversion_error(&Value::String(s.clone()), target, err)),
            (Ty::Decimal, Value::Decimal(d)) => Ok(Value::Decimal(d)),
            (Ty::Decimal, Value::Int(i)) => Ok(Value::Decimal(i as f64)),
            (Ty::Decimal, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Value::Decimal)
                .map_err(|err| conversion_error(&Value::String(s.clone()), target, err)),
            (Ty::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Ty::Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(conversion_error(&Value::String(s.clone()), target, "not a boolean")),
            },
            (Ty::Char, Value::Char(c)) => Ok(Value::Char(c)),
            (Ty::Char, Value::String(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(conversion_error(
                        &Value::String(s.clone()),
                        target,
                        "not a single character",
                    )),
                }
            }
            (Ty::String, value) if is_scalar(&value) => Ok(Value::String(value.into_name())),
            (Ty::Named(class), Value::Object(object)) if object.type_name() == class.as_str() => {
                Ok(Value::Object(object))
            }
            (target, value) => Err(conversion_error(&value, target, "incompatible value")),
        }
    }
}
