//! One module per subcommand.  Each exposes an `execute` function that
//! `main` dispatches to.

pub mod add;
pub mod change_password;
pub mod copy;
pub mod delete;
pub mod duplicate;
pub mod edit;
pub mod generate;
pub mod init;
pub mod list;
pub mod show;
pub mod version;
