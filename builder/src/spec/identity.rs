//! Working-container identity generation.

/// Length of generated identity tokens.
pub const IDENTITY_LEN: usize = 8;

/// Source of working-container names, consulted once per spec.
pub trait IdentitySource {
    /// Produce a fresh identity token.
    fn next_identity(&self) -> String;
}

/// Random identity: the first eight hex digits of a v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentity;

impl IdentitySource for RandomIdentity {
    fn next_identity(&self) -> String {
        let mut token = uuid::Uuid::new_v4().simple().to_string();
        token.truncate(IDENTITY_LEN);
        token
    }
}

/// Fixed identity, for reproducible output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentity(pub String);

impl FixedIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }
}

impl IdentitySource for FixedIdentity {
    fn next_identity(&self) -> String {
        self.0.clone()
    }
}
