use thiserror::Error;

/// Catalog read failures. A missing test case is not an error — both
/// catalog methods return `Option`/empty `Vec` for that case — this enum
/// covers the collaborator itself being unreachable or misbehaving.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Persistence failures. Per §5/§7, every call site treats these as
/// fire-and-log: a `StoreError` is never propagated into the response.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("result store backend error: {0}")]
    Backend(String),
}
