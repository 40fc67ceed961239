pub mod mimc;
pub mod poseidon;
