//! Shared fixtures for resolver tests: an in-memory container, a
//! placeholder evaluator and a scalar coercer.
#![allow(dead_code)]

pub mod container;
pub mod scalar;

pub use container::TestContainer;
pub use scalar::{PlaceholderEvaluator, ScalarCoercer};

use bp_core::{Blueprint, Value};

/// Class whose instances are factories; their `product` property is the real object.
pub const FACTORY_CLASS: &str = "test.Factory";
/// Class whose instances are the explicit null object.
pub const NULL_CLASS: &str = "test.Null";
/// Class whose construction always fails.
pub const FAILING_CLASS: &str = "test.Failing";

pub const OWNER_NAME: &str = "owner";

/// Object created by [`TestContainer`].
#[derive(Debug)]
pub struct TestBean {
    pub name: String,
    pub class_name: String,
    pub args: Vec<Value>,
    pub properties: Vec<(String, Value)>,
}

impl TestBean {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

pub fn as_bean(value: &Value) -> &TestBean {
    value
        .as_object()
        .and_then(|object| object.downcast_ref::<TestBean>())
        .unwrap_or_else(|| panic!("expected a test bean, got {:?}", value))
}

pub fn owner_blueprint() -> Blueprint {
    Blueprint::new("test.Owner").with_resource_description("test context [beans.xml]")
}
