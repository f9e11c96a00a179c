#![doc = "The `atelier` library crate."]
#![doc = ""]
#![doc = "A small API for managing projects and their nested tasks, protected by a"]
#![doc = "username/password login that issues a signed bearer token. This crate holds"]
#![doc = "the domain models, the store abstraction with its Postgres and in-memory"]
#![doc = "implementations, authentication, routing and error handling; the binary"]
#![doc = "(`main.rs`) wires it all into a running server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
