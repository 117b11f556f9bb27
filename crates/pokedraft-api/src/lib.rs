// HTTP access to the evolution-chain catalog.

pub mod client;

pub use client::PokeApiClient;
