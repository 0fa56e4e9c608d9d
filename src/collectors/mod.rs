pub mod df;
pub mod mounts;
