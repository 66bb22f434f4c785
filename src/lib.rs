#![allow(async_fn_in_trait)]
pub mod cli;
pub mod credential;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod query;
