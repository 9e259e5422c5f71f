//! End-to-end operations through the facade, on both reconciliation paths.

mod common;

use common::*;
use connector_delta::connector::{ConnectorCapabilities, ConnectorOperation, OperationOptions};
use connector_delta::delta::{AttributeDeltaSet, ComplexAttributeDelta};
use connector_delta::objects::{Attribute, AttributeSet, AttributeValue, ObjectClass, filters};
use connector_delta::{ConnectorFacade, FacadeConfig};

async fn add_then_remove(capabilities: ConnectorCapabilities) -> AttributeSet {
    let facade = ConnectorFacade::new(seeded_connector(capabilities).await);
    let options = OperationOptions::default();

    facade
        .add_attribute_values(
            &ObjectClass::ACCOUNT,
            &jdoe(),
            set(vec![attr("mail", &["j@example.org"]), attr("sn", &["Doe"])]),
            &options,
        )
        .await
        .unwrap();
    facade
        .remove_attribute_values(
            &ObjectClass::ACCOUNT,
            &jdoe(),
            set(vec![attr("mail", &["jdoe@example.com"])]),
            &options,
        )
        .await
        .unwrap();

    stored(facade.connector(), &jdoe()).await
}

#[tokio::test]
async fn test_both_paths_reach_the_same_state() {
    let native = add_then_remove(ConnectorCapabilities::full()).await;
    let emulated = add_then_remove(ConnectorCapabilities::replace_only()).await;

    assert_eq!(native, emulated);
    assert_eq!(
        strings(native.get("mail").unwrap()),
        vec!["john@example.com", "j@example.org"]
    );
    assert_eq!(strings(native.get("sn").unwrap()), vec!["Doe"]);
}

#[tokio::test]
async fn test_all_object_class_rejected_everywhere() {
    let facade = ConnectorFacade::new(seeded_connector(ConnectorCapabilities::full()).await);
    let options = OperationOptions::default();
    let values = set(vec![attr("mail", &["x"])]);

    let results = [
        facade
            .update(&ObjectClass::ALL, &jdoe(), values.clone(), &options)
            .await
            .map(|_| ()),
        facade
            .add_attribute_values(&ObjectClass::ALL, &jdoe(), values.clone(), &options)
            .await
            .map(|_| ()),
        facade
            .remove_attribute_values(&ObjectClass::ALL, &jdoe(), values, &options)
            .await
            .map(|_| ()),
        facade
            .complex_update_delta(&ObjectClass::ALL, &jdoe(), AttributeDeltaSet::new(), &options)
            .await
            .map(|_| ()),
    ];

    for result in results {
        assert!(result.unwrap_err().is_invalid_argument());
    }
    let connector = facade.connector();
    for operation in ConnectorOperation::ALL {
        assert_eq!(connector.calls(operation), 0, "{} was dispatched", operation);
    }
}

#[tokio::test]
async fn test_custom_operational_attributes_from_json() {
    let config = FacadeConfig::from_json(r#"{"operationalAttributes": ["employeeNumber"]}"#).unwrap();
    let facade = ConnectorFacade::with_config(
        seeded_connector(ConnectorCapabilities::replace_only()).await,
        config,
    );
    let options = OperationOptions::default();

    let err = facade
        .add_attribute_values(&ObjectClass::ACCOUNT, &jdoe(), set(vec![attr("EmployeeNumber", &["7"])]), &options)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Operational attribute 'EmployeeNumber'"));

    // no longer operational under this configuration
    facade
        .add_attribute_values(&ObjectClass::ACCOUNT, &jdoe(), set(vec![attr("__ENABLE__", &["true"])]), &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_replace_update_cannot_set_uid() {
    let facade = ConnectorFacade::new(seeded_connector(ConnectorCapabilities::full()).await);
    let err = facade
        .update(
            &ObjectClass::ACCOUNT,
            &jdoe(),
            set(vec![attr("__UID__", &["other"])]),
            &OperationOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(facade.connector().calls(ConnectorOperation::Update), 0);
}

#[tokio::test]
async fn test_emulated_delta_merges_into_embedded_roles() {
    init_logging();
    let connector = connector_delta::InMemoryConnector::with_capabilities(
        ConnectorCapabilities::replace_only(),
    );
    let admin = role("admin", 1);
    let user = role("user", 1);
    connector
        .insert_object(
            &ObjectClass::ACCOUNT,
            &jdoe(),
            set(vec![
                Attribute::new("roles", vec![admin, user.clone()]).unwrap(),
                attr("mail", &["jdoe@example.com"]),
            ]),
        )
        .await
        .unwrap();
    let facade = ConnectorFacade::new(connector);

    let promote = ComplexAttributeDelta::builder("level")
        .delete_all()
        .add([3])
        .build()
        .unwrap();
    let roles = ComplexAttributeDelta::builder("roles")
        .merge(Some(filters::embedded_attribute_equals("name", "admin")), [promote])
        .build()
        .unwrap();
    let mail = ComplexAttributeDelta::builder("mail").delete_all().build().unwrap();
    let deltas = AttributeDeltaSet::from_deltas([roles, mail]).unwrap();

    let side_effects = facade
        .complex_update_delta(&ObjectClass::ACCOUNT, &jdoe(), deltas, &OperationOptions::default())
        .await
        .unwrap();
    assert!(side_effects.is_empty());

    let stored = stored(facade.connector(), &jdoe()).await;
    assert!(!stored.contains("mail"));

    let roles = stored.get("roles").unwrap().values();
    assert_eq!(roles.len(), 2);
    let promoted = roles[0].as_embedded().unwrap();
    assert_eq!(promoted.attribute("level").unwrap().values(), &[AttributeValue::from(3)]);
    assert_eq!(roles[1], user);
}

#[tokio::test]
async fn test_create_get_delete_lifecycle() {
    init_logging();
    let facade = ConnectorFacade::new(connector_delta::InMemoryConnector::new());
    let options = OperationOptions::builder().attributes_to_get(["cn"]).build();

    let uid = facade
        .create(
            &ObjectClass::GROUP,
            set(vec![attr("__NAME__", &["admins"]), attr("cn", &["Administrators"])]),
            &OperationOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(uid.value(), "admins");

    let object = facade
        .get_object(&ObjectClass::GROUP, &uid, &options)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(object.attributes().names(), vec!["cn"]);

    facade
        .delete(&ObjectClass::GROUP, &uid, &OperationOptions::default())
        .await
        .unwrap();
    let err = facade
        .delete(&ObjectClass::GROUP, &uid, &OperationOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
