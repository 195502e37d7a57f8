use clap::Args;
use storefront_app::auth::{NewUser, PgAuthService, UserUuid};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Customer email; also matches guest orders placed with it
    #[arg(long)]
    email: String,

    /// Customer full name
    #[arg(long)]
    full_name: String,

    /// Optional contact phone
    #[arg(long)]
    phone: Option<String>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    let (user, token) = PgAuthService::new(pool)
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            full_name: args.full_name,
            phone: args.phone,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("token_uuid: {}", token.uuid);
    println!("api_token: {}", token.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
