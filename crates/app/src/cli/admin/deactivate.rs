use clap::Args;
use storefront_app::auth::{AdminUuid, PgAuthService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct DeactivateAdminArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Administrator to disable
    #[arg(long)]
    admin_uuid: Uuid,
}

pub(crate) async fn run(args: DeactivateAdminArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    PgAuthService::new(pool)
        .deactivate_admin(AdminUuid::from_uuid(args.admin_uuid))
        .await
        .map_err(|error| format!("failed to deactivate admin: {error}"))?;

    println!("deactivated admin {}", args.admin_uuid);

    Ok(())
}
