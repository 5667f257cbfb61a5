//! Client side of the registry and service contracts.
//!
//! - [`RemoteDirectory`] opens a session to the registry and resolves names.
//! - [`RemoteConcatService`] is the handle a lookup returns.
//! - [`RemoteConcatClient`] drives one prompt → call → display cycle.

mod concat_client;
mod directory;
mod service;

pub use concat_client::{
    //
    RemoteConcatClient,
    FIRST_PROMPT,
    RESULT_LABEL,
    SECOND_PROMPT,
};
pub use directory::RemoteDirectory;
pub use service::RemoteConcatService;
