//! Data layer: core types, loading, filtering, aggregation and export.
//!
//! Architecture:
//! ```text
//!  oup_upso_processed.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + coerce → TitleDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ TitleDataset  │  Vec<TitleRecord>, retained columns, year bounds
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year range → row indices
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌───────────┐  ┌──────────┐
//!   │ aggregate │  │  export   │  display table, CSV bytes
//!   └───────────┘  └──────────┘
//! ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures;
