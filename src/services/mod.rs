pub mod interaction;
pub mod pixel_map;
pub mod session;
pub mod wallet;
pub mod wish;
