//! In-memory directory used by the workflow tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use kc_directory::{
    DirectoryClient, DirectoryError, DirectoryResult, Group, GroupQuery, NewUser, User, UserQuery,
};

/// Directory operations, used for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    QueryUsers,
    CreateUser,
    SetPassword,
    DeleteUser,
    ListGroups,
    GroupByPath,
    UserGroups,
    AddMember,
    RemoveMember,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    /// Every group, nested or not, keyed by its full path.
    groups: Vec<Group>,
    memberships: HashSet<(String, String)>,
    passwords: HashMap<String, (String, bool)>,
    calls: Vec<Op>,
    failing: HashSet<Op>,
    failing_groups: HashSet<String>,
    path_lookup_unsupported: bool,
    create_without_id: bool,
    next_id: u32,
}

/// Fake directory with the admin API's observable behavior.
#[derive(Default)]
pub struct MemoryDirectory {
    state: Mutex<State>,
}

impl MemoryDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("directory state poisoned")
    }

    /// Registers an existing user keyed by email and returns its id.
    pub fn add_user(&self, id: &str, email: &str) -> String {
        self.state().users.push(User {
            id: id.to_string(),
            username: email.to_lowercase(),
            email: Some(email.to_string()),
            enabled: true,
            email_verified: true,
            ..User::default()
        });
        id.to_string()
    }

    /// Registers a pre-existing group at the given path.
    pub fn add_group(&self, id: &str, path: &str) {
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        self.state().groups.push(Group {
            id: id.to_string(),
            name,
            path: path.to_string(),
            sub_groups: Vec::new(),
        });
    }

    pub fn add_member(&self, user_id: &str, group_id: &str) {
        self.state()
            .memberships
            .insert((user_id.to_string(), group_id.to_string()));
    }

    /// Makes every call of `op` fail with a server error.
    pub fn fail(&self, op: Op) {
        self.state().failing.insert(op);
    }

    /// Makes adding anyone to `group_id` fail.
    pub fn fail_add_to(&self, group_id: &str) {
        self.state().failing_groups.insert(group_id.to_string());
    }

    /// Simulates a deployment without the group-by-path endpoint.
    pub fn disable_path_lookup(&self) {
        self.state().path_lookup_unsupported = true;
    }

    /// Makes user creation succeed without reporting an id.
    pub fn create_without_id(&self) {
        self.state().create_without_id = true;
    }

    pub fn calls(&self, op: Op) -> usize {
        self.state().calls.iter().filter(|c| **c == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.state().calls.len()
    }

    pub fn user_count(&self) -> usize {
        self.state().users.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.state()
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
    }

    pub fn password_of(&self, user_id: &str) -> Option<(String, bool)> {
        self.state().passwords.get(user_id).cloned()
    }

    pub fn is_member(&self, user_id: &str, group_id: &str) -> bool {
        self.state()
            .memberships
            .contains(&(user_id.to_string(), group_id.to_string()))
    }

    pub fn groups_of(&self, user_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state()
            .memberships
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, g)| g.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Records the call and returns the injected failure, if any.
    fn enter(&self, op: Op) -> DirectoryResult<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(op);
        if state.failing.contains(&op) {
            return Err(DirectoryError::api(500, format!("injected {op:?} failure")));
        }
        Ok(state)
    }
}

/// Builds the nested representation the admin API returns for a group.
fn with_children(all: &[Group], group: &Group) -> Group {
    let prefix = format!("{}/", group.path);
    let sub_groups = all
        .iter()
        .filter(|g| g.path.starts_with(&prefix) && !g.path[prefix.len()..].contains('/'))
        .map(|g| with_children(all, g))
        .collect();
    Group {
        sub_groups,
        ..group.clone()
    }
}

#[async_trait]
impl DirectoryClient for MemoryDirectory {
    async fn query_users(&self, query: &UserQuery) -> DirectoryResult<Vec<User>> {
        let state = self.enter(Op::QueryUsers)?;
        Ok(state
            .users
            .iter()
            .filter(|u| {
                query
                    .email
                    .as_deref()
                    .map_or(true, |e| u.email.as_deref() == Some(e))
                    && query
                        .username
                        .as_deref()
                        .map_or(true, |n| u.username == n.to_lowercase())
            })
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> DirectoryResult<Option<String>> {
        let mut state = self.enter(Op::CreateUser)?;
        if state.users.iter().any(|u| u.username == user.username.to_lowercase()) {
            return Err(DirectoryError::api(409, "User exists with same username"));
        }
        state.next_id += 1;
        let id = format!("user-{}", state.next_id);
        state.users.push(User {
            id: id.clone(),
            username: user.username.to_lowercase(),
            email: Some(user.email.clone()),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            enabled: user.enabled,
            email_verified: user.email_verified,
            attributes: user.attributes.clone(),
            required_actions: user.required_actions.clone(),
        });
        if state.create_without_id {
            return Ok(None);
        }
        Ok(Some(id))
    }

    async fn set_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> DirectoryResult<()> {
        let mut state = self.enter(Op::SetPassword)?;
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(DirectoryError::not_found("user", user_id));
        }
        state
            .passwords
            .insert(user_id.to_string(), (password.to_string(), temporary));
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> DirectoryResult<()> {
        let mut state = self.enter(Op::DeleteUser)?;
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        if state.users.len() == before {
            return Err(DirectoryError::not_found("user", user_id));
        }
        state.memberships.retain(|(u, _)| u != user_id);
        Ok(())
    }

    async fn list_groups(&self, query: Option<&GroupQuery>) -> DirectoryResult<Vec<Group>> {
        let state = self.enter(Op::ListGroups)?;
        let term = query.and_then(|q| q.search.as_deref());
        Ok(state
            .groups
            .iter()
            .filter(|g| g.is_root())
            .map(|g| with_children(&state.groups, g))
            .filter(|g| term.map_or(true, |t| g.flatten().any(|c| c.name.contains(t))))
            .collect())
    }

    async fn group_by_path(&self, path: &str) -> DirectoryResult<Group> {
        let state = self.enter(Op::GroupByPath)?;
        if state.path_lookup_unsupported {
            return Err(DirectoryError::not_found("group", path));
        }
        state
            .groups
            .iter()
            .find(|g| g.path == path)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found("group", path))
    }

    async fn user_groups(&self, user_id: &str) -> DirectoryResult<Vec<Group>> {
        let state = self.enter(Op::UserGroups)?;
        Ok(state
            .groups
            .iter()
            .filter(|g| state.memberships.contains(&(user_id.to_string(), g.id.clone())))
            .cloned()
            .collect())
    }

    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()> {
        let mut state = self.enter(Op::AddMember)?;
        if state.failing_groups.contains(group_id) {
            return Err(DirectoryError::api(403, format!("cannot join {group_id}")));
        }
        state
            .memberships
            .insert((user_id.to_string(), group_id.to_string()));
        Ok(())
    }

    async fn remove_user_from_group(&self, user_id: &str, group_id: &str) -> DirectoryResult<()> {
        let mut state = self.enter(Op::RemoveMember)?;
        if !state
            .memberships
            .remove(&(user_id.to_string(), group_id.to_string()))
        {
            return Err(DirectoryError::not_found("membership", format!("{user_id}/{group_id}")));
        }
        Ok(())
    }
}
