pub mod pose;

pub use pose::Pose;
