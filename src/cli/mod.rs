pub mod info;
pub mod list;
pub mod run;
pub mod validate;

pub use info::cmd_info;
pub use list::{cmd_list, ListArgs};
pub use run::{cmd_run, RunArgs};
pub use validate::{cmd_validate, ValidateArgs};
