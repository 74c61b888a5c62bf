//! Software SAI switch object engine.
//!
//! Holds switch objects (ports, routes, next hops, ACL tables and entries
//! and the rest of the SAI catalog) in memory, validates every operation
//! against a per-type attribute schema and keeps a back-reference ledger so
//! referenced objects cannot be removed. On top of the store sit two
//! decision engines that answer what the configured hardware would do:
//!
//! ```text
//! [Operation] ──> [SwitchEngine] ──> [BulkExecutor] ──> [ObjectStore + RefLedger]
//!                       │                                     │
//!                       ├──> [AclEngine] ─────────────────────┤
//!                       ├──> [RouteEngine] ───────────────────┤
//!                       └──> [Pipeline] (ACL, LPM, group, egress ACL)
//! ```
//!
//! # Key Components
//!
//! - [`api::SwitchEngine`]: entry point for object operations
//! - [`schema::SchemaRegistry`]: attribute metadata of every object type
//! - [`store::ObjectStore`]: objects, attribute values and references
//! - [`acl::AclEngine`]: ACL stage evaluation
//! - [`route::RouteEngine`]: longest-prefix match and next-hop group selection
//! - [`pipeline::Pipeline`]: one forwarding decision across all stages
//! - [`server`]: the line-oriented JSON request server

pub mod acl;
pub mod api;
pub mod bulk;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod route;
pub mod schema;
pub mod server;
pub mod store;
pub mod types;
pub mod value;

pub use api::{Operation, OperationKind, OperationResult, SwitchEngine};
pub use config::{EngineConfig, ServerConfig};
pub use error::{SaiError, SaiResult, SaiStatus};
pub use store::ObjectStore;
pub use types::{ObjectType, RawSaiObjectId, NULL_OBJECT_ID};
pub use value::{AttrValue, ValueKind};
