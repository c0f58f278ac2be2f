//! Encoders consuming a decoded [`Catalog`](crate::models::Catalog).
//!
//! - [`xml`] - Provisioning XML block, resolving link destinations
//! - [`csv`] - Normalized Catalogs row
//!
//! Both are independent: neither mutates the catalog, and either can run
//! any number of times.

pub mod csv;
pub mod xml;

pub use self::csv::CsvEncoder;
pub use self::xml::{XmlEncoder, ACTION_CREATE_OR_UPDATE};
