use clap::{Args, Subcommand};

mod create;
mod deactivate;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    Create(create::CreateAdminArgs),
    Deactivate(deactivate::DeactivateAdminArgs),
}

pub(crate) async fn run(command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Create(args) => create::run(args).await,
        AdminSubcommand::Deactivate(args) => deactivate::run(args).await,
    }
}
