pub mod merkle_root;
pub mod mimc;
pub mod semaphore;
