//! User provisioning commands.

use std::sync::Arc;

use kc_directory::DirectoryClient;
use kc_provision::UserProvisioner;

use crate::cli::UserCommand;
use crate::config::OutputFormat;
use crate::output::{output_id, prompt_password};

/// Runs a user command.
pub async fn run_user(
    cmd: UserCommand,
    directory: Arc<dyn DirectoryClient>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let provisioner = UserProvisioner::new(directory);

    match cmd {
        UserCommand::Create {
            email,
            first_name,
            last_name,
            password,
            groups,
        } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            create_user(
                &provisioner,
                &email,
                &first_name,
                &last_name,
                &password,
                &groups,
                output_format,
            )
            .await
        }
        UserCommand::Delete { id } => {
            provisioner.delete_user(&id).await;
            Ok(())
        }
    }
}

/// Creates a user and prints its id.
#[allow(clippy::too_many_arguments)]
async fn create_user(
    provisioner: &UserProvisioner,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    groups: &[String],
    format: OutputFormat,
) -> crate::CliResult<()> {
    if email.trim().is_empty() {
        return Err(crate::CliError::Validation("email must not be empty".to_string()));
    }

    match provisioner
        .create_user(email, first_name, last_name, password, groups)
        .await
    {
        Some(user_id) => output_id("User ID", &user_id, format),
        None => Err(crate::CliError::Provisioning(email.to_string())),
    }
}

/// Prompts twice for the new user's password.
fn read_password() -> crate::CliResult<String> {
    let p = prompt_password("Enter password: ")?;
    let confirm_pwd = prompt_password("Confirm password: ")?;
    if p != confirm_pwd {
        return Err(crate::CliError::Validation("Passwords do not match".to_string()));
    }
    Ok(p)
}
