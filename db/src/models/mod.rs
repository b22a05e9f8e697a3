pub mod piscina;
pub mod user;
