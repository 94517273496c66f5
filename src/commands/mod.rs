// Association lifecycle commands
pub mod association;
