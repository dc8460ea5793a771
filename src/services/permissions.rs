use crate::models::config::TransferSettings;
use crate::models::roles::{Actor, CredentialId};

/// Everything the preconditions need to know about an invocation.
#[derive(Debug, Default)]
pub struct InvocationContext {
    pub in_guild: bool,
    /// The invoker as a guild member, if they could be resolved as one.
    pub invoker: Option<Actor>,
    pub bot_can_manage_roles: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    GuildOnly,
    InvokerHolds(CredentialId),
    BotCanManageRoles
}

/// Message sent when the bot itself can't manage roles.
pub const MISSING_MANAGE_ROLES: &str = "I need the Manage Roles permission in this server to transfer roles.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    /// Silent denial; the reason only goes to the log.
    Deny(String),
    /// Denial the invoker is told about.
    Refuse(String)
}

impl Precondition {
    pub fn check(&self, ctx: &InvocationContext) -> Verdict {
        match self {
            Precondition::GuildOnly => {
                if ctx.in_guild {
                    Verdict::Allow
                } else {
                    Verdict::Deny("not in a guild".to_string())
                }
            }
            Precondition::InvokerHolds(id) => match &ctx.invoker {
                None => Verdict::Deny("invoker is not a guild member".to_string()),
                Some(invoker) if invoker.has_credential(*id) => Verdict::Allow,
                Some(invoker) => Verdict::Deny(format!("{} does not hold role {id}", invoker.display_name))
            },
            Precondition::BotCanManageRoles => {
                if ctx.bot_can_manage_roles {
                    Verdict::Allow
                } else {
                    Verdict::Refuse(MISSING_MANAGE_ROLES.to_string())
                }
            }
        }
    }
}

/// Checks run, in order, before `transferroles` is allowed to execute.
///
/// Invoker checks come first, so someone without the required role never learns anything about
/// the bot's own permissions.
pub fn transfer_preconditions(settings: &TransferSettings) -> [Precondition; 3] {
    [
        Precondition::GuildOnly,
        Precondition::InvokerHolds(settings.required_role),
        Precondition::BotCanManageRoles
    ]
}

/// Stops at the first precondition that denies.
pub fn evaluate(preconditions: &[Precondition], ctx: &InvocationContext) -> Verdict {
    for precondition in preconditions {
        match precondition.check(ctx) {
            Verdict::Allow => continue,
            denied => return denied
        }
    }

    Verdict::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::fixtures::*;

    fn settings() -> TransferSettings {
        TransferSettings { required_role: CredentialId(50), quarantine_role: CredentialId(60) }
    }

    fn moderator_invocation() -> InvocationContext {
        InvocationContext {
            in_guild: true,
            invoker: Some(member(2, "mod", vec![role(50, 9)])),
            bot_can_manage_roles: true
        }
    }

    #[test]
    fn moderator_in_guild_is_allowed() {
        let checks = transfer_preconditions(&settings());
        assert_eq!(evaluate(&checks, &moderator_invocation()), Verdict::Allow);
    }

    #[test]
    fn outside_a_guild_is_denied() {
        let checks = transfer_preconditions(&settings());
        let ctx = InvocationContext { in_guild: false, ..moderator_invocation() };

        assert_eq!(evaluate(&checks, &ctx), Verdict::Deny("not in a guild".to_string()));
    }

    #[test]
    fn unresolved_invoker_is_denied() {
        let checks = transfer_preconditions(&settings());
        let ctx = InvocationContext { invoker: None, ..moderator_invocation() };

        assert!(matches!(evaluate(&checks, &ctx), Verdict::Deny(_)));
    }

    #[test]
    fn invoker_without_required_role_is_denied() {
        let checks = transfer_preconditions(&settings());
        let ctx = InvocationContext {
            invoker: Some(member(3, "pleb", vec![role(51, 9), admin_role(52, 10)])),
            ..moderator_invocation()
        };

        assert_eq!(evaluate(&checks, &ctx), Verdict::Deny("pleb does not hold role 50".to_string()));
    }

    #[test]
    fn bot_without_manage_roles_is_refused() {
        let checks = transfer_preconditions(&settings());
        let ctx = InvocationContext { bot_can_manage_roles: false, ..moderator_invocation() };

        assert_eq!(evaluate(&checks, &ctx), Verdict::Refuse(MISSING_MANAGE_ROLES.to_string()));
    }

    #[test]
    fn invoker_denials_are_silent_and_bot_denial_is_reported() {
        let checks = transfer_preconditions(&settings());

        let outsider = InvocationContext {
            invoker: Some(member(3, "pleb", vec![])),
            bot_can_manage_roles: false,
            ..moderator_invocation()
        };
        assert!(matches!(evaluate(&checks, &outsider), Verdict::Deny(_)));

        let not_in_guild = InvocationContext { in_guild: false, bot_can_manage_roles: false, ..moderator_invocation() };
        assert!(matches!(evaluate(&checks, &not_in_guild), Verdict::Deny(_)));

        let moderator = InvocationContext { bot_can_manage_roles: false, ..moderator_invocation() };
        assert!(matches!(evaluate(&checks, &moderator), Verdict::Refuse(_)));
    }

    #[test]
    fn first_failure_is_reported() {
        let checks = transfer_preconditions(&settings());
        let ctx = InvocationContext::default();

        assert_eq!(evaluate(&checks, &ctx), Verdict::Deny("not in a guild".to_string()));
    }
}
