pub mod config;
pub mod participants;
pub mod rounds;
pub mod standings;
pub mod teams;
