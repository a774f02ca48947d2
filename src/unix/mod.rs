mod lsof;

pub use lsof::{LSOF_ARGS, lsof_sampler};
