//! # vcreg-client — Registry Interaction Client
//!
//! Client for the verifiable-credential registry contract: registers
//! credential schemas and issuers, binds issuers to the schemas they may
//! use, and verifies bindings against live registry state.
//!
//! ## Architecture
//!
//! Every mutating call runs the same pipeline: validate payload
//! encodability, resolve the session's registry handle, submit the signed
//! operation through the external signer capability, await inclusion at
//! the configured confirmation depth, then read the touched entity back
//! through a contract view. Read calls resolve the handle and query a view
//! with the paired caller identity. The pipeline is an explicit state
//! machine ([`pipeline::CallPhase`]) — each transition is traced, and
//! failures map onto the fixed taxonomy in
//! [`vcreg_core::RegistryError`].
//!
//! ## External capabilities
//!
//! The wallet ([`signer::Signer`]) and the ledger node
//! ([`node::RegistryNode`]) are capability traits. Production adapters
//! ([`signer::HttpWalletSigner`], [`rpc::RpcRegistryNode`]) speak HTTP to
//! a wallet relay and a node; tests substitute in-memory fakes. Trait
//! methods are synchronous — HTTP adapters block on the ambient Tokio
//! runtime internally, so async callers should wrap client calls in
//! `tokio::task::spawn_blocking`.
//!
//! ## Concurrency
//!
//! One logical session per process: a single paired signer and target
//! registry address, replaced only by an explicit [`session::Session::connect`].
//! Calls are independent — the client never serializes them against each
//! other; the ledger orders operations by account counter. A handle
//! captured by an in-flight call survives a concurrent re-`connect`.

pub mod calls;
pub mod config;
pub mod node;
pub mod pipeline;
pub mod registry;
mod retry;
pub mod rpc;
pub mod session;
pub mod signer;

// Re-export primary types.
pub use calls::{Mutation, OperationPayload, ResultExtractor, View};
pub use config::{ClientConfig, ConfigError};
pub use node::{ConfirmationPolicy, NodeError, OperationReceipt, RegistryNode};
pub use pipeline::{CallPhase, ConfirmedOperation};
pub use registry::{Confirmed, ReadBack, RegistryClient};
pub use rpc::RpcRegistryNode;
pub use session::{RegistryHandle, Session};
pub use signer::{HttpWalletSigner, Signer, SignerError};
