//! Route grouping: partition routes into the minimum number of deployable
//! groups such that members share compatible deployment configs.
//!
//! Grouping is a strictly sequential fold over the declared route order:
//! conflict detection, sequential regeneration numbering, and group index
//! assignment all depend on encounter order.

mod grouper;
mod hash;
mod isr;

pub use grouper::{Group, GroupedRoutes, group_routes};
pub use hash::config_hash;
pub use isr::{IsrDescriptor, RESERVED_QUERY_PARAM};

use thiserror::Error;

/// Fatal authoring errors raised during grouping, before any file I/O.
#[derive(Debug, Error)]
pub enum GroupError {
    /// Two routes collide on one dispatch pattern but need different
    /// deployment configs, which cannot be one deployable unit.
    #[error(
        "routes `{first}` and `{second}` share the dispatch pattern `{pattern}` \
         but have incompatible deployment configs; align their configs or set \
         `split` to separate them"
    )]
    ConflictingConfig {
        first: String,
        second: String,
        pattern: String,
    },

    /// Incremental regeneration needs a persistent-process runtime.
    #[error(
        "route `{route}` enables incremental regeneration but resolves to \
         runtime `{runtime}`; regeneration requires a persistent runtime \
         (nodejsNN.x)"
    )]
    IsrOnEphemeralRuntime { route: String, runtime: String },

    /// The reserved query parameter is managed by the adapter itself.
    #[error(
        "route `{route}` lists the reserved query parameter `{param}` in \
         `isr.allowQuery`; it is added automatically and must not be declared"
    )]
    ReservedQueryParam { route: String, param: &'static str },
}
