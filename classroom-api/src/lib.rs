pub mod catalog;
pub mod classroom;
pub mod comparison;
pub mod export;
pub mod matching;
pub mod name_format;
pub mod question;
pub mod roster;
pub mod scan;
pub mod store;
pub mod student;
pub mod types;
pub mod unzip;
