//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use connector_delta::connector::{ConnectorCapabilities, InMemoryConnector};
use connector_delta::objects::{Attribute, AttributeSet, AttributeValue, EmbeddedObject, ObjectClass, Uid};

/// Install a test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A string-valued attribute.
pub fn attr(name: &str, values: &[&str]) -> Attribute {
    Attribute::new(name, values.iter().map(|v| AttributeValue::from(*v)).collect()).unwrap()
}

pub fn set(attributes: Vec<Attribute>) -> AttributeSet {
    AttributeSet::from_attributes(attributes).unwrap()
}

pub fn strings(attribute: &Attribute) -> Vec<&str> {
    attribute
        .values()
        .iter()
        .filter_map(AttributeValue::as_str)
        .collect()
}

/// An embedded `role` object with a name and a level.
pub fn role(name: &str, level: i64) -> AttributeValue {
    AttributeValue::embedded(EmbeddedObject::new(
        ObjectClass::new("role").unwrap(),
        set(vec![
            Attribute::new("name", vec![name.into()]).unwrap(),
            Attribute::new("level", vec![level.into()]).unwrap(),
        ]),
    ))
}

/// The account every scenario starts from.
pub fn jdoe() -> Uid {
    Uid::new("jdoe").unwrap()
}

pub fn jdoe_attributes() -> AttributeSet {
    set(vec![
        attr("__NAME__", &["jdoe"]),
        attr("mail", &["jdoe@example.com", "john@example.com"]),
        attr("cn", &["John Doe"]),
    ])
}

/// A connector with the given capabilities holding the `jdoe` account.
pub async fn seeded_connector(capabilities: ConnectorCapabilities) -> InMemoryConnector {
    init_logging();
    let connector = InMemoryConnector::with_capabilities(capabilities);
    connector
        .insert_object(&ObjectClass::ACCOUNT, &jdoe(), jdoe_attributes())
        .await
        .unwrap();
    connector
}

pub async fn stored(connector: &InMemoryConnector, uid: &Uid) -> AttributeSet {
    connector
        .stored_attributes(&ObjectClass::ACCOUNT, uid)
        .await
        .unwrap()
        .expect("object should exist")
}
