use uuid::Uuid;

/// Identity for one app run, injected into screens at construction instead
/// of living in an ambient global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
}

impl SessionContext {
    /// Fresh throwaway identity, one per launch. Nothing is persisted; the
    /// backend is authentication-free.
    pub fn ephemeral() -> Self {
        Self {
            user_id: format!("demo-user-{}", Uuid::new_v4().simple()),
        }
    }

    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_identities_are_unique_and_prefixed() {
        let a = SessionContext::ephemeral();
        let b = SessionContext::ephemeral();
        assert!(a.user_id.starts_with("demo-user-"));
        assert_ne!(a.user_id, b.user_id);
    }
}
