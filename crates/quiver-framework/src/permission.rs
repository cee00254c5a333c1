//! Eligibility checks run before a command executes.
//!
//! The registry consults a [`PermissionPolicy`] after a command is found and
//! before its executor runs. A denied sender yields
//! [`DispatchOutcome::NoPermission`](crate::registry::DispatchOutcome).
//!
//! Any `Fn(&S, &CommandConfig) -> bool` closure is a policy.

use crate::command::CommandConfig;

/// Decides whether a sender may run a command.
pub trait PermissionPolicy<S>: Send + Sync + 'static {
    fn is_eligible(&self, sender: &S, command: &CommandConfig) -> bool;
}

impl<S, F> PermissionPolicy<S> for F
where
    F: Fn(&S, &CommandConfig) -> bool + Send + Sync + 'static,
{
    fn is_eligible(&self, sender: &S, command: &CommandConfig) -> bool {
        self(sender, command)
    }
}

/// Lets every sender run every command. The registry default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<S> PermissionPolicy<S> for AllowAll {
    fn is_eligible(&self, _sender: &S, _command: &CommandConfig) -> bool {
        true
    }
}

/// Checks a command's [`permission`](CommandConfig::permission) node against
/// the sender. Commands without a node are open to everyone.
#[derive(Debug, Clone)]
pub struct RequirePermission<F>(F);

impl<F> RequirePermission<F> {
    /// `has_permission(sender, node)` decides whether `sender` holds `node`.
    pub fn new(has_permission: F) -> Self {
        Self(has_permission)
    }
}

impl<S, F> PermissionPolicy<S> for RequirePermission<F>
where
    F: Fn(&S, &str) -> bool + Send + Sync + 'static,
{
    fn is_eligible(&self, sender: &S, command: &CommandConfig) -> bool {
        command
            .permission
            .as_deref()
            .is_none_or(|node| (self.0)(sender, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        nodes: Vec<&'static str>,
    }

    fn has_node(user: &User, node: &str) -> bool {
        user.nodes.contains(&node)
    }

    #[test]
    fn test_allow_all() {
        let command = CommandConfig::new("anything").permission("root");
        assert!(AllowAll.is_eligible(&(), &command));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |sender: &u32, _command: &CommandConfig| *sender > 10;
        let command = CommandConfig::new("x");
        assert!(policy.is_eligible(&11, &command));
        assert!(!policy.is_eligible(&1, &command));
    }

    #[test]
    fn test_require_permission() {
        let policy = RequirePermission::new(has_node);
        let admin = User {
            nodes: vec!["admin.kick"],
        };
        let guest = User { nodes: vec![] };

        let kick = CommandConfig::new("kick").permission("admin.kick");
        let help = CommandConfig::new("help");

        assert!(policy.is_eligible(&admin, &kick));
        assert!(!policy.is_eligible(&guest, &kick));
        assert!(policy.is_eligible(&guest, &help));
    }
}
