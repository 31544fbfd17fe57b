//! Backend data: records, loading a snapshot and joining collections into
//! table rows.

pub mod join;
pub mod model;
pub mod source;

use std::fmt;

use clap::ValueEnum;

pub use model::{Dataset, EntityId};

/// A browsable collection, one per table screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Apartments,
    Tenants,
    Craftsmen,
    Issues,
    Contracts,
}

impl Collection {
    pub const ALL: [Self; 5] = [
        Self::Apartments,
        Self::Tenants,
        Self::Craftsmen,
        Self::Issues,
        Self::Contracts,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Apartments => "Apartments",
            Self::Tenants => "Tenants",
            Self::Craftsmen => "Craftsmen",
            Self::Issues => "Issues",
            Self::Contracts => "Contracts",
        }
    }

    /// Stable name used on the command line and in the config file.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Apartments => "apartments",
            Self::Tenants => "tenants",
            Self::Craftsmen => "craftsmen",
            Self::Issues => "issues",
            Self::Contracts => "contracts",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
