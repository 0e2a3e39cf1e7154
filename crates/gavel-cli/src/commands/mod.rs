pub mod db;
pub mod problems;
pub mod submissions;
