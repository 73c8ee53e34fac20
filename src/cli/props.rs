use tabled::Table;

use crate::{
    config, error,
    management::{Properties, Property, PropertyStore},
    success,
    types::PropertyRow,
    utils, warning,
};

pub async fn set_property(property: Property, value: String) {
    let (store, mut props) = load().await;

    if property == Property::AuthorizationCode && props.get(Property::AccessToken).is_some() {
        warning!(
            "An access token is stored, so the new code will not be exchanged. Unset accessToken to use it."
        );
    }

    props.set(property, value);
    save(&store, &props).await;
    success!("{} updated", property);
}

pub async fn unset_property(property: Property) {
    let (store, mut props) = load().await;
    props.unset(property);
    save(&store, &props).await;
    success!("{} removed", property);
}

pub async fn list_properties() {
    let (store, props) = load().await;

    let rows: Vec<PropertyRow> = Property::ALL
        .iter()
        .map(|p| PropertyRow {
            key: p.key().to_string(),
            value: match props.get(*p) {
                Some(v) if p.is_secret() => utils::mask_secret(v),
                Some(v) => v.to_string(),
                None => "(unset)".to_string(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("{}", store.path().display());
}

async fn load() -> (PropertyStore, Properties) {
    let store = PropertyStore::new(config::properties_path());
    match store.load().await {
        Ok(props) => (store, props),
        Err(e) => error!("Cannot load properties. Err: {}", e),
    }
}

async fn save(store: &PropertyStore, props: &Properties) {
    if let Err(e) = store.persist(props).await {
        error!("Cannot save properties. Err: {}", e);
    }
}
