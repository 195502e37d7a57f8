use clap::Args;
use storefront_app::auth::{AdminUuid, NewAdmin, PgAuthService};

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Administrator email
    #[arg(long)]
    email: String,

    /// Administrator display name
    #[arg(long)]
    name: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    let (admin, token) = PgAuthService::new(pool)
        .create_admin(NewAdmin {
            uuid: AdminUuid::new(),
            email: args.email,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create admin: {error}"))?;

    println!("admin_uuid: {}", admin.uuid);
    println!("admin_email: {}", admin.email);
    println!("token_uuid: {}", token.uuid);
    println!("api_token: {}", token.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
