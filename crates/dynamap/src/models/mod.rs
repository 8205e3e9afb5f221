mod sample;

pub use sample::{sample_descriptor, SampleEntity};
