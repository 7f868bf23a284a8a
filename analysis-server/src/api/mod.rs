pub mod error;
pub mod gate;
pub mod handlers;
pub mod router;
pub mod tenant;

#[cfg(test)]
pub(crate) mod test_utils;
