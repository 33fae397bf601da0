pub mod account;
pub mod client;
pub mod queries;

#[cfg(test)]
pub mod testing;
