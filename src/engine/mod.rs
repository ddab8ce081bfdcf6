pub mod feedback;
pub mod filter;
pub mod review;
pub mod sampler;
pub mod scoring;

pub use scoring::Score;
