mod common;

mod policy;
mod reassignment;
