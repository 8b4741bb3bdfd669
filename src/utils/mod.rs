pub mod ansi;
pub mod colors;
pub mod path;
pub mod table;
