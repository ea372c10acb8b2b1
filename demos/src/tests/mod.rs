mod buffered;
mod test_runner;

pub use test_runner::run;
