// Job matching engine: requirement extraction, per-source normalization,
// filtering and resume-match scoring. The engine modules are synchronous and
// free of I/O; `source` and `handlers` are the only parts that touch the network.

pub mod filter;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod requirements;
pub mod scoring;
pub mod source;
