use crate::Stash;

/// Context key holding the raw `Authorization` header of a request.
pub const AUTHORIZATION: &str = "authorization";

pub trait Auth: Send + Sync {
    fn is_admin(&self, context: &Stash) -> bool;
}

pub struct NoAuth;

impl Auth for NoAuth {
    fn is_admin(&self, _context: &Stash) -> bool {
        true
    }
}

/// Admits requests carrying `Authorization: Bearer <token>` for a single static admin token.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Auth for BearerAuth {
    fn is_admin(&self, context: &Stash) -> bool {
        context
            .get(AUTHORIZATION)
            .and_then(|v| v.as_str())
            .and_then(|header| header.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(header: &str) -> Stash {
        let mut ctx = Stash::new();
        ctx.insert(AUTHORIZATION.to_string(), json!(header));
        ctx
    }

    #[test]
    fn no_auth_admits_everyone() {
        assert!(NoAuth.is_admin(&Stash::new()));
    }

    #[test]
    fn bearer_auth_requires_matching_token() {
        let auth = BearerAuth::new("s3cret");
        assert!(auth.is_admin(&context("Bearer s3cret")));
        assert!(!auth.is_admin(&context("Bearer nope")));
        assert!(!auth.is_admin(&context("s3cret")));
        assert!(!auth.is_admin(&Stash::new()));
    }
}
