use crate::cli::Command;
use crate::client::ApiClient;
use crate::error::{ClientError, ClientErrorExt};
use crate::render;
use crate::session::{SavedSession, SessionFile};
use caphub::domain::identity::{Permissions, UserProfile};
use caphub::features::identity::hash_password;
use std::io::Write;
use tracing::debug;

pub(crate) const LEAD_ONLY_UNREGISTER: &str = "Only practice leads can unregister consultants";

/// One CLI invocation: a client, the session file backing it and the user it resolved to.
#[derive(Debug)]
pub struct App {
    client: ApiClient,
    session_file: SessionFile,
    user: Option<UserProfile>,
}

impl App {
    /// Restores any saved session for `server` and asks the server who it belongs to.
    ///
    /// A token the server no longer knows is forgotten.
    pub async fn connect(server: &str, session_file: SessionFile) -> Result<Self, ClientError> {
        let client = ApiClient::new(server, None)?;
        let saved = session_file.load(client.server());
        let client = client.with_token(saved.map(|s| s.token));

        let mut app = Self { client, session_file, user: None };
        if app.client.token().is_some() {
            app.user = app.client.me().await?.user;
            if app.user.is_none() {
                debug!("Saved session expired");
                app.session_file.clear()?;
            }
        }
        Ok(app)
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<(), ClientError> {
        let refresh = command.is_mutation();

        match command {
            Command::List => {
                render::user(out, self.user())?;
                writeln!(out)?;
            }
            Command::Login { username, password } => {
                let response = self.client.login(&username, &password).await?;
                let token = response.token.clone();
                self.session_file.save(&SavedSession {
                    server: self.client.server().to_owned(),
                    username: response.user.username.clone(),
                    token,
                })?;
                writeln!(out, "{}", response.message)?;
                self.user = Some(response.user);
                return Ok(());
            }
            Command::Logout => {
                let response = self.client.logout().await?;
                self.session_file.clear()?;
                self.user = None;
                writeln!(out, "{}", response.message)?;
                return Ok(());
            }
            Command::Whoami => return Ok(render::user(out, self.user())?),
            Command::Register { capability, email } => {
                let response = self.client.register(&capability, &email).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::Unregister { capability, email } => {
                if !self.user().is_some_and(|u| u.can(Permissions::UNREGISTER)) {
                    return Err(ClientError::denied(LEAD_ONLY_UNREGISTER));
                }
                let response = self.client.unregister(&capability, &email).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::Requests => {
                let response = self.client.pending_requests().await?;
                return Ok(render::requests(out, &response.requests)?);
            }
            Command::Approve { capability, email } => {
                let response = self.client.approve(&capability, &email).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::Reject { capability, email } => {
                let response = self.client.reject(&capability, &email).await?;
                writeln!(out, "{}", response.message)?;
            }
            Command::HashPassword { password, iterations } => {
                return print_hash(&password, iterations, out);
            }
        }

        if refresh {
            writeln!(out)?;
        }
        self.show_catalog(out).await
    }

    async fn show_catalog(&self, out: &mut impl Write) -> Result<(), ClientError> {
        let catalog = self.client.capabilities().await?;
        render::catalog(out, &catalog, self.user()).context("Rendering capabilities")
    }
}

/// Runs a command that needs no server; `None` when `command` needs one.
pub fn execute_offline(command: &Command, out: &mut impl Write) -> Option<Result<(), ClientError>> {
    let Command::HashPassword { password, iterations } = command else { return None };
    Some(print_hash(password, *iterations, out))
}

fn print_hash(password: &str, iterations: u32, out: &mut impl Write) -> Result<(), ClientError> {
    let hash = hash_password(password, iterations).map_err(|e| ClientError::config(e.to_string()))?;
    writeln!(out, "{hash}").context("Writing output")
}
