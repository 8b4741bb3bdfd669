pub mod agenda;
pub mod checkin;
pub mod checkins;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
