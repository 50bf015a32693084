use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::is_development;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a JWT for local testing (development only)")]
    Mint {
        #[arg(long, help = "User id claim (random if omitted)")]
        user_id: Option<Uuid>,

        #[arg(long, help = "Profile id claim (random if omitted)")]
        profile_id: Option<Uuid>,

        #[arg(long, default_value = "dev", help = "Username claim")]
        username: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { user_id, profile_id, username } => {
            if !is_development!() {
                anyhow::bail!("Token minting is only available in development mode");
            }

            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let profile_id = profile_id.unwrap_or_else(Uuid::new_v4);

            let claims = Claims::new(user_id, profile_id, username.clone());
            let expires_at = claims.exp;
            let token = generate_jwt(claims)
                .map_err(|e| anyhow::anyhow!("Cannot mint token: {}", e))?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token minted",
                    Some(json!({
                        "token": token,
                        "user_id": user_id,
                        "profile_id": profile_id,
                        "username": username,
                        "expires_at": expires_at,
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
