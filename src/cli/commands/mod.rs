//! CLI command implementations

pub mod env;
pub mod info;
pub mod init;
pub mod records;
pub mod run;

pub use env::execute as env;
pub use info::execute as info;
pub use init::execute as init;
pub use records::execute as records;
pub use run::execute as run;
