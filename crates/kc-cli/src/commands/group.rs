//! Group membership commands.

use std::sync::Arc;

use kc_directory::{DirectoryClient, Group, GroupQuery};
use kc_provision::GroupMembershipManager;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::GroupCommand;
use crate::config::OutputFormat;
use crate::output::{output, output_id, success};

/// Group representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct GroupDisplay {
    /// Group ID.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Path in the group hierarchy.
    pub path: String,
}

impl From<&Group> for GroupDisplay {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            path: group.path.clone(),
        }
    }
}

/// Runs a group command.
pub async fn run_group(
    cmd: GroupCommand,
    directory: Arc<dyn DirectoryClient>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let manager = GroupMembershipManager::new(directory.clone());

    match cmd {
        GroupCommand::List { search } => {
            list_groups(&manager, directory.as_ref(), search, output_format).await
        }
        GroupCommand::Resolve { path } => {
            let id = manager.get_group_id_by_path(&path).await?;
            output_id(&path, &id, output_format)
        }
        GroupCommand::Add { email, path } => {
            let user_id = manager.get_user_id_by_email(&email).await?;
            let group_id = manager.get_group_id_by_path(&path).await?;
            manager.add_user_to_group(&user_id, &group_id).await?;
            success(&format!("Added {} to {}", email, path));
            Ok(())
        }
        GroupCommand::Remove { email, path } => {
            let user_id = manager.get_user_id_by_email(&email).await?;
            let group_id = manager.get_group_id_by_path(&path).await?;
            manager.remove_user_from_group(&user_id, &group_id).await?;
            success(&format!("Removed {} from {}", email, path));
            Ok(())
        }
        GroupCommand::Move { email, from, to } => {
            manager.move_user_between_groups(&email, &from, &to).await?;
            success(&format!("Moved {} from {} to {}", email, from, to));
            Ok(())
        }
    }
}

/// Lists groups, flattening nested children into rows.
async fn list_groups(
    manager: &GroupMembershipManager,
    directory: &dyn DirectoryClient,
    search: Option<String>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let groups = match search {
        Some(term) => directory.list_groups(Some(&GroupQuery::search(term))).await?,
        None => manager.get_all_groups().await?,
    };

    let rows = flatten_rows(&groups);
    output(&rows, format)
}

fn flatten_rows(groups: &[Group]) -> Vec<GroupDisplay> {
    groups
        .iter()
        .flat_map(Group::flatten)
        .map(GroupDisplay::from)
        .collect()
}
