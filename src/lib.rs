pub mod config;
pub mod fetch;
pub mod poll;
pub mod present;
pub mod process;
pub mod session;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;
