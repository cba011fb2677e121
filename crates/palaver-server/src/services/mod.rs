//! Application services. Each operation is a command struct with a
//! `perform` method; handlers build the command from the request and call
//! it against the [`App`](crate::App).

pub mod posts;
pub mod replies;
