//! Root crate facade for the ttlbin server and core library.

pub use ttlbin_core::{
    availability, clock, ids, service, Availability, Backend, PasteService, PasteStore,
    PasteView, StorageConfig, UnavailableReason, ViewOutcome,
};
pub use ttlbin_server::{
    config, create_app, db, error, handlers, models, pages, resolve_bind_address, serve_router,
    AppError, AppState, Config, Database,
};
