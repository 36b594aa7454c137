mod output;

pub use output::{Output, coverage_style};
