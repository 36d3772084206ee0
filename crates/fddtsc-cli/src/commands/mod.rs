pub mod build;

#[cfg(test)]
mod build_tests;
