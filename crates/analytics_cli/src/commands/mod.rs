pub mod login;
pub mod stats;
pub mod status;
pub mod track;
