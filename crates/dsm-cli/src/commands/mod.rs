pub mod extract;
pub mod mkdir;
pub mod plot;
