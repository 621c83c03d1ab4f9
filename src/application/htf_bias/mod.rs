pub mod scoring;

pub use scoring::compute_htf_bias;
