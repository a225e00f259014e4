//! Catalog service library following the hexagonal architecture pattern
//!
//! Products of four categories share one base record and extend it with a
//! category specific detail record. Users own collections of products.
//! The domain layer only talks to storage and identity through the ports in
//! [domain::ports]; the http router and the postgres / jwt adapters live in
//! [inbound] and [outbound].

pub mod domain;
pub mod inbound;
pub mod outbound;
