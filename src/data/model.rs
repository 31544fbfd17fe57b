//! Records as the backend returns them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Backend-assigned identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Text(String),
}

impl EntityId {
    /// Whether this id renders as `key`, e.g. a table row key.
    pub fn is(&self, key: &str) -> bool {
        match self {
            Self::Number(n) => key.parse::<u64>().is_ok_and(|k| k == *n),
            Self::Text(s) => s == key,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// `/daire`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: EntityId,
    pub block: String,
    pub number: String,
    #[serde(default)]
    pub floor: Option<i64>,
    /// Room layout such as `3+1`.
    #[serde(default)]
    pub rooms: Option<String>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub owner_id: Option<EntityId>,
}

impl Apartment {
    pub fn label(&self) -> String {
        format!("{}-{}", self.block, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Tenant,
    Admin,
    #[serde(other)]
    Other,
}

/// `/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// `/usta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craftsman {
    pub id: EntityId,
    pub name: String,
    pub trade: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Average rating, absent until the first job is rated.
    #[serde(default)]
    pub score: Option<f64>,
}

/// `/kontrat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: EntityId,
    pub apartment_id: EntityId,
    pub tenant_id: EntityId,
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    pub monthly_rent: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "TRY".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In progress",
            Self::Resolved => "Resolved",
        }
    }

    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

/// `/ariza`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: EntityId,
    pub apartment_id: EntityId,
    #[serde(default)]
    pub craftsman_id: Option<EntityId>,
    pub title: String,
    pub status: IssueStatus,
    pub reported_at: NaiveDate,
}

/// Snapshot of every backend collection the UI shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub apartments: Vec<Apartment>,
    pub users: Vec<User>,
    pub craftsmen: Vec<Craftsman>,
    pub contracts: Vec<Contract>,
    pub issues: Vec<Issue>,
}

impl Dataset {
    pub fn user(&self, id: &EntityId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn apartment(&self, id: &EntityId) -> Option<&Apartment> {
        self.apartments.iter().find(|a| &a.id == id)
    }

    pub fn owners(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Owner)
    }

    pub fn tenants(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Tenant)
    }
}
