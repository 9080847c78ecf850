pub mod clean;
pub mod run;
pub mod scan;
pub mod shell;
pub mod status;
