// src/domain/service.rs

//! Service-level abstractions: the remote contract and the directory that
//! hands out implementations of it.

use crate::Result;
use std::sync::Arc;

/// The remote concatenation contract.
///
/// How the two strings are joined is decided by the server; callers display
/// the returned value as is.
#[async_trait::async_trait]
pub trait ConcatService: Send + Sync {
    async fn input(&self, first: &str, second: &str) -> Result<String>;
}

/// Handle to a resolved service.
pub type ServicePtr = Arc<dyn ConcatService>;

/// A naming directory mapping service names to invokable handles.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    /// Resolve the service bound under `name`.
    ///
    /// Fails with `Resolution` when nothing usable is bound there and with
    /// `Connectivity` when the directory itself is lost mid-lookup.
    async fn lookup(&self, name: &str) -> Result<ServicePtr>;

    /// Release the directory session.
    async fn close(&self) -> Result<()>;
}

/// Shared directory pointer.
pub type DirectoryPtr = Arc<dyn Directory>;
