pub mod init;
pub mod preview;
pub mod split;
