//! # Fallback Update Example
//!
//! Runs the same value updates against a connector that supports them natively
//! and against one that can only replace whole attributes, and shows that both
//! end in the same state. Run with `RUST_LOG=debug` to see which path each
//! update takes.

use connector_delta::connector::{
    ConnectorCapabilities, ConnectorOperation, InMemoryConnector, OperationOptions,
};
use connector_delta::delta::{AttributeDeltaSet, ComplexAttributeDelta};
use connector_delta::objects::{Attribute, AttributeSet, ObjectClass, Uid, filters};
use connector_delta::ConnectorFacade;

fn attributes(name: &str, values: &[&str]) -> Result<AttributeSet, Box<dyn std::error::Error>> {
    let attribute = Attribute::new(name, values.iter().map(|v| (*v).into()).collect())?;
    Ok(AttributeSet::from_attributes([attribute])?)
}

async fn run(
    label: &str,
    capabilities: ConnectorCapabilities,
) -> Result<AttributeSet, Box<dyn std::error::Error>> {
    log::info!("--- {} connector ---", label);

    let facade = ConnectorFacade::new(InMemoryConnector::with_capabilities(capabilities));
    let options = OperationOptions::default();

    let mut initial = attributes("__NAME__", &["developers"])?;
    initial.insert(Attribute::new(
        "member",
        vec!["alice".into(), "bob".into()],
    )?);
    let uid: Uid = facade.create(&ObjectClass::GROUP, initial, &options).await?;

    facade
        .add_attribute_values(&ObjectClass::GROUP, &uid, attributes("member", &["carol"])?, &options)
        .await?;
    facade
        .remove_attribute_values(&ObjectClass::GROUP, &uid, attributes("member", &["alice"])?, &options)
        .await?;

    let rename = ComplexAttributeDelta::builder("description")
        .delete_all()
        .add(["Platform developers"])
        .build()?;
    let drop_bob = ComplexAttributeDelta::builder("member")
        .delete_matching(filters::equal_to("bob"))
        .build()?;
    facade
        .complex_update_delta(
            &ObjectClass::GROUP,
            &uid,
            AttributeDeltaSet::from_deltas([rename, drop_bob])?,
            &options,
        )
        .await?;

    let connector = facade.connector();
    for operation in ConnectorOperation::ALL {
        log::info!("{:>24}: {} call(s)", operation, connector.calls(operation));
    }

    let object = facade
        .get_object(&ObjectClass::GROUP, &uid, &options)
        .await?
        .ok_or("group disappeared")?;
    Ok(object.into_attributes())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let native = run("native", ConnectorCapabilities::full()).await?;
    let emulated = run("replace-only", ConnectorCapabilities::replace_only()).await?;

    for attribute in &emulated {
        log::info!("{}", attribute);
    }
    log::info!("same final state on both paths: {}", native == emulated);
    Ok(())
}
