use clap::Args;
use storefront_app::auth::PgAuthService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Token UUIDs to revoke; repeat the flag for several tokens
    #[arg(long = "token-uuid", required = true)]
    token_uuids: Vec<Uuid>,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let auth = PgAuthService::new(crate::cli::connect(&args.database_url).await?);

    for token_uuid in args.token_uuids {
        let was_active = auth
            .revoke_api_token(token_uuid)
            .await
            .map_err(|error| format!("failed to revoke token {token_uuid}: {error}"))?;

        if was_active {
            println!("revoked token {token_uuid}");
        } else {
            println!("token {token_uuid} was not active");
        }
    }

    Ok(())
}
