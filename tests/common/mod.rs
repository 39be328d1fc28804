#![allow(dead_code)]

use deserializing_connection::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const USER_ID: &str = "417df760-0d16-408f-8201-ec7760dee9fb";
pub const PROJECT_A: &str = "05f620c2-ea64-4012-816f-884310f69dd0";
pub const PROJECT_B: &str = "91f47435-208d-4344-990b-ae17bd4b13fa";
pub const PROJECT_EXTRA: &str = "260ca83c-de97-423a-96eb-6a697372ec9e";
pub const COMPANY_ID: &str = "3a3fe751-b621-4baa-a0f1-41b660ca877b";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectIdList(pub Vec<ProjectId>);

impl ProjectIdList {
    #[must_use]
    pub fn add_id(mut self, id: ProjectId) -> Self {
        self.0.push(id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_id: CompanyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub accessible_projects: ProjectIdList,
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub token: String,
    pub access_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: ProjectId,
    pub name: String,
    pub token: Option<AccessToken>,
}

pub const SCHEMA: &str = "
    CREATE TABLE users (
        user_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        accessible_projects TEXT NOT NULL,
        companies TEXT,
        is_admin INTEGER NOT NULL
    );
    INSERT INTO users VALUES
        ('417df760-0d16-408f-8201-ec7760dee9fb', 'John Doe',
         '[\"05f620c2-ea64-4012-816f-884310f69dd0\"]',
         '[{\"companyId\": \"3a3fe751-b621-4baa-a0f1-41b660ca877b\", \"name\": \"Stark Industries\"}]',
         1),
        ('8c1bc0a5-8c3c-44a4-9c43-6b46ad0d5d54', 'Jane Roe',
         '[]',
         NULL,
         0);
";

/// An in-memory database with the `users` table.
pub async fn sqlite_executor() -> Result<SqliteExecutor, DeserializingConnectionError> {
    let executor = SqliteExecutor::builder(":memory:".to_string()).build().await?;
    executor.execute_batch(SCHEMA).await?;
    Ok(executor)
}

pub async fn connection(
    options: DeserializingOptions,
) -> Result<DeserializingConnection<SqliteExecutor>, DeserializingConnectionError> {
    Ok(DeserializingConnection::new(sqlite_executor().await?, options))
}

pub fn uppercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        other => other,
    }
}

pub fn uppercase_transformer(key: &str) -> ResultTransformer {
    ResultTransformer::to_transform(key, Transformation::raw(|payload, _, _| uppercase(payload)))
        .expect("valid key")
}
