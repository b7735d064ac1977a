//! SOP retrieval engine.
//!
//! Raw SOP documents are split into cabin-scoped sections by the indexer, published through a
//! [`SopStore`](store::SopStore), and searched by the resolver for a cabin name and issue keywords.
//! Everything in here is pure computation over already-loaded text: no I/O, and no failure modes.

pub mod index;
pub mod normalize;
pub mod resolve;
pub mod store;

pub use index::{RawDocument, SopIndex, index};
pub use resolve::{Entry, Resolution, SopMatch, resolve};
pub use store::SopStore;
