//! Protocol review workflows. Only the reviewer-assignment slice lives in
//! the core; intake, document exchange, and decision letters are separate
//! collaborators that read and write the same store.

pub mod assignment;
