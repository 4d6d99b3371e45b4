//! Collection access for the record store.
//!
//! Every function is generic over `T: Record`, which supplies the collection
//! path. Writes return `()`: callers reload the collection after mutating it.

use reqwest::Method;
use serde_json::{Map, Value};

use crate::{
    error::StoreError,
    fetch::StoreClient,
    lenient::items_of,
    models::{Record, RecordId},
};

/// Fetch the whole collection. A successful answer that is not an array is
/// read as an empty collection.
pub async fn list<T: Record>(client: &StoreClient) -> Result<Vec<T>, StoreError> {
    let data = client
        .fetch(Method::GET, T::COLLECTION, &[], None)
        .await
        .into_result()?;

    Ok(data.map(items_of).unwrap_or_default())
}

/// Look a record up through the `?id=` filter query.
///
/// The filter matches ids by their string form, so a record stored with a
/// numeric id is still found from a textual one and vice versa.
pub async fn find_by_id<T: Record>(
    client: &StoreClient,
    id: &RecordId,
) -> Result<Option<T>, StoreError> {
    let data = client
        .fetch(Method::GET, T::COLLECTION, &[("id", id.as_key())], None)
        .await
        .into_result()?;

    Ok(data
        .map(items_of::<T>)
        .and_then(|found| found.into_iter().next()))
}

/// Look a record up through the `?id=` filter and return it exactly as
/// stored.
///
/// Used as the base of full-record replacements, so fields the typed models
/// normalize or do not know about are written back untouched.
pub async fn find_raw_by_id<T: Record>(
    client: &StoreClient,
    id: &RecordId,
) -> Result<Option<Map<String, Value>>, StoreError> {
    let data = client
        .fetch(Method::GET, T::COLLECTION, &[("id", id.as_key())], None)
        .await
        .into_result()?;

    let Some(Value::Array(found)) = data else {
        return Ok(None);
    };

    Ok(found.into_iter().find_map(|item| match item {
        Value::Object(fields) => Some(fields),
        _ => None,
    }))
}

/// Create a record; the store assigns its id.
pub async fn create<T: Record>(client: &StoreClient, body: &Value) -> Result<(), StoreError> {
    client
        .fetch(Method::POST, T::COLLECTION, &[], Some(body))
        .await
        .into_result()?;
    Ok(())
}

/// Full-record replacement (`PUT /{collection}/{id}`)
pub async fn replace<T: Record>(
    client: &StoreClient,
    id: &RecordId,
    body: &Value,
) -> Result<(), StoreError> {
    let path = format!("{}/{}", T::COLLECTION, id);
    client
        .fetch(Method::PUT, &path, &[], Some(body))
        .await
        .into_result()?;
    Ok(())
}

/// `DELETE /{collection}/{id}`
pub async fn remove<T: Record>(client: &StoreClient, id: &RecordId) -> Result<(), StoreError> {
    let path = format!("{}/{}", T::COLLECTION, id);
    client
        .fetch(Method::DELETE, &path, &[], None)
        .await
        .into_result()?;
    Ok(())
}
