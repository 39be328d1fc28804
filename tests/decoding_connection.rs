#![cfg(feature = "sqlite")]

mod common;

use common::sqlite_executor;
use deserializing_connection::prelude::*;
use serde_json::json;
use std::error::Error;

fn decoders(entries: &[(&str, DecoderType)]) -> DecoderTypes {
    entries
        .iter()
        .map(|(column, decoder)| ((*column).to_string(), *decoder))
        .collect()
}

#[tokio::test]
async fn fetch_one_distinguishes_no_row_from_null() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);

    let none = conn
        .fetch_one(
            "SELECT name FROM users WHERE user_id = ?1",
            &[RowValues::Text("missing".into())],
            None,
        )
        .await?;
    assert_eq!(none, None);

    let null = conn.fetch_one("SELECT NULL AS value", &[], None).await?;
    assert_eq!(null, Some(json!(null)));

    let decoded = conn
        .fetch_one("SELECT '[1, 2]' AS value", &[], Some(DecoderType::Json))
        .await?;
    assert_eq!(decoded, Some(json!([1, 2])));

    let empty_array = conn
        .fetch_one("SELECT NULL AS value", &[], Some(DecoderType::JsonEmptyArrayOnNull))
        .await?;
    assert_eq!(empty_array, Some(json!([])));
    Ok(())
}

#[tokio::test]
async fn fetch_associative_decodes_only_listed_columns() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    let row = conn
        .fetch_associative(
            "SELECT user_id, name, accessible_projects, is_admin FROM users WHERE name = ?1",
            &[RowValues::Text("John Doe".into())],
            &decoders(&[
                ("accessible_projects", DecoderType::Json),
                ("is_admin", DecoderType::Bool),
                ("not_selected", DecoderType::Int),
            ]),
        )
        .await?
        .expect("row exists");

    assert_eq!(row["name"], json!("John Doe"));
    assert_eq!(row["accessible_projects"], json!([common::PROJECT_A]));
    assert_eq!(row["is_admin"], json!(true));
    assert!(!row.contains_key("not_selected"));

    let keys: Vec<&String> = row.keys().collect();
    assert_eq!(keys, ["user_id", "name", "accessible_projects", "is_admin"]);
    Ok(())
}

#[tokio::test]
async fn fetch_all_associative_on_empty_result_is_empty() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    let rows = conn
        .fetch_all_associative("SELECT * FROM users WHERE 0", &[], &DecoderTypes::new())
        .await?;
    assert!(rows.is_empty());

    let rows = conn
        .fetch_all_associative(
            "SELECT name, companies FROM users ORDER BY name",
            &[],
            &decoders(&[("companies", DecoderType::NullableJson)]),
        )
        .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["companies"], json!(null));
    assert_eq!(rows[1]["companies"][0]["name"], json!("Stark Industries"));
    Ok(())
}

#[tokio::test]
async fn fetch_all_associative_indexed_keys_by_column() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    let indexed = conn
        .fetch_all_associative_indexed(
            "SELECT is_admin, name FROM users ORDER BY name",
            &[],
            &DecoderTypes::new(),
            "is_admin",
        )
        .await?;
    let keys: Vec<&String> = indexed.keys().collect();
    assert_eq!(keys, ["0", "1"]);
    assert_eq!(indexed["1"]["name"], json!("John Doe"));

    let err = conn
        .fetch_all_associative_indexed(
            "SELECT name FROM users",
            &[],
            &DecoderTypes::new(),
            "user_id",
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeserializingConnectionError::IndexColumnNotFound(ref column) if column == "user_id"
    ));
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn fetch_first_column_decodes_every_row() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    let projects = conn
        .fetch_first_column(
            "SELECT accessible_projects FROM users ORDER BY name DESC",
            &[],
            Some(DecoderType::Json),
        )
        .await?;
    assert_eq!(projects, vec![json!([common::PROJECT_A]), json!([])]);
    Ok(())
}

#[tokio::test]
async fn fetch_int_requires_exactly_one_native_int() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    assert_eq!(conn.fetch_int("SELECT COUNT(*) FROM users", &[]).await?, 2);

    let err = conn.fetch_int("SELECT '42'", &[]).await.unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::QueryDidNotReturnAnInt));

    let err = conn.fetch_int("SELECT is_admin FROM users", &[]).await.unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::QueryDidNotReturnExactlyOneResult));

    let err = conn.fetch_int("SELECT 1, 2", &[]).await.unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::QueryDidNotReturnExactlyOneResult));

    let err = conn.fetch_int("SELECT 1 WHERE 0", &[]).await.unwrap_err();
    assert!(err.is_type_mismatch());
    Ok(())
}

#[tokio::test]
async fn fetch_bool_accepts_sqlite_integers() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    assert!(
        conn.fetch_bool(
            "SELECT is_admin FROM users WHERE user_id = ?1",
            &[RowValues::Text(common::USER_ID.into())],
        )
        .await?
    );
    assert!(!conn.fetch_bool("SELECT false", &[]).await?);

    let err = conn.fetch_bool("SELECT 'true'", &[]).await.unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::QueryDidNotReturnABoolean));

    let err = conn.fetch_bool("SELECT 2", &[]).await.unwrap_err();
    assert!(matches!(err, DeserializingConnectionError::QueryDidNotReturnABoolean));
    Ok(())
}

#[tokio::test]
async fn decode_policy_controls_unparseable_scalars() -> Result<(), Box<dyn Error>> {
    let permissive = DecodingConnection::new(sqlite_executor().await?);
    let value = permissive
        .fetch_one("SELECT 'abc'", &[], Some(DecoderType::Int))
        .await?;
    assert_eq!(value, Some(json!(0)));

    let strict = DecodingConnection::with_policy(sqlite_executor().await?, DecodePolicy::Strict);
    let err = strict
        .fetch_one("SELECT 'abc'", &[], Some(DecoderType::Int))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeserializingConnectionError::NotDecodable { decoder: DecoderType::Int, .. }
    ));
    assert_eq!(
        strict.fetch_one("SELECT ' 17 '", &[], Some(DecoderType::Int)).await?,
        Some(json!(17))
    );
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_data_error() -> Result<(), Box<dyn Error>> {
    let conn = DecodingConnection::new(sqlite_executor().await?);
    let err = conn
        .fetch_one("SELECT '{not json'", &[], Some(DecoderType::Json))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeserializingConnectionError::InvalidJson { ref value, .. } if value == "{not json"
    ));
    assert!(err.is_data_error());
    Ok(())
}
