pub mod filter;

#[cfg(test)]
pub mod test_support;
