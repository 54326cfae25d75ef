pub mod list;
pub mod run;
pub mod validate;

use crate::args::{Cli, Command};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::List(args) => list::list(args),
        Command::Validate(args) => validate::validate(args),
    }
}
