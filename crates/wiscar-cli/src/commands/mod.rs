pub mod compare;
pub mod init;
pub mod list;
pub mod radar;
pub mod score;
pub mod take;
pub mod validate;
