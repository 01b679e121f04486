use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};
use directory_purge::{
    filter::{UsernamePattern, DEFAULT_DOMAIN, DEFAULT_USERNAME_LENGTH},
    purge::Purge,
    server::{self, ServeConfig},
    users::DeleteOutcome,
    Client, Credentials,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Opt {
    #[command(flatten)]
    credentials: CredentialArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CredentialArgs {
    /// OAuth2 client ID.
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    client_id: String,
    /// OAuth2 client secret.
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,
    /// Refresh token issued to the client.
    #[arg(long, env = "GOOGLE_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: String,
}

#[derive(Debug, Args)]
struct PatternArgs {
    /// Only users of this domain are considered.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    domain: String,
    /// Exact number of letters and digits in a matching username.
    #[arg(long, default_value_t = DEFAULT_USERNAME_LENGTH)]
    username_length: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the control page and its API.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8787")]
        listen: SocketAddr,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Print the users matching the pattern.
    List {
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Delete the users matching the pattern, one at a time.
    Purge {
        #[command(flatten)]
        pattern: PatternArgs,
        /// Actually delete. Without this only the candidates are printed.
        #[arg(long)]
        yes: bool,
    },
}

impl PatternArgs {
    fn pattern(&self) -> Result<UsernamePattern, directory_purge::Error> {
        UsernamePattern::new(self.domain.clone(), self.username_length)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::parse();
    let CredentialArgs {
        client_id,
        client_secret,
        refresh_token,
    } = opt.credentials;
    let client = Client::builder()
        .with_credentials(Credentials::new(client_id, client_secret, refresh_token))
        .build()?;

    match opt.command {
        Command::Serve { listen, pattern } => {
            server::serve(ServeConfig {
                listen_address: listen,
                client,
                pattern: pattern.pattern()?,
            })
            .await?
        }
        Command::List { pattern } => {
            let pattern = pattern.pattern()?;
            for user in client.list_by_username_pattern(&pattern).await? {
                println!("{}", user.primary_email.unwrap_or_default());
            }
        }
        Command::Purge { pattern, yes } => {
            let pattern = pattern.pattern()?;
            let purge = Purge::new(&client, &pattern);
            if !yes {
                let candidates = purge.candidates().await?;
                for user in &candidates {
                    println!("{}", user.primary_email.as_deref().unwrap_or_default());
                }
                println!("{} users would be deleted, pass --yes to delete them", candidates.len());
                return Ok(());
            }

            let summary = purge
                .run(|progress| match progress.outcome {
                    DeleteOutcome::Deleted { email } => {
                        println!("[{}/{}] deleted {email}", progress.done, progress.total)
                    }
                    DeleteOutcome::Failed { email, body, .. } => {
                        println!("[{}/{}] failed {email}: {body}", progress.done, progress.total)
                    }
                })
                .await?;
            println!(
                "Done. Deleted: {}, failed: {}",
                summary.deleted,
                summary.failed.len()
            );
        }
    };

    Ok(())
}
