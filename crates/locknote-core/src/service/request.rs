//! Input for save and edit operations.

/// Content, lock intent and tags for a save or edit.
#[derive(Clone, Default)]
pub struct SaveNote {
    /// Existing note to overwrite (save only; edit takes the id separately)
    pub id: Option<i64>,

    /// Plaintext content
    pub content: String,

    /// New password, if one is being set
    pub password: Option<String>,

    /// Whether the note should be encrypted at rest after this call
    pub lock: bool,

    /// Raw tag input, normalized before storage
    pub tags: Vec<String>,
}

impl SaveNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn locked(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl std::fmt::Debug for SaveNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveNote")
            .field("id", &self.id)
            .field("content", &"[REDACTED]")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("lock", &self.lock)
            .field("tags", &self.tags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = SaveNote::new("body")
            .with_id(7)
            .with_password("pw")
            .locked(true)
            .with_tags(vec!["a".to_string()]);

        assert_eq!(request.id, Some(7));
        assert_eq!(request.content, "body");
        assert_eq!(request.password.as_deref(), Some("pw"));
        assert!(request.lock);
        assert_eq!(request.tags.len(), 1);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let request = SaveNote::new("my diary").with_password("hunter2");
        let debug_output = format!("{:?}", request);
        assert!(!debug_output.contains("my diary"));
        assert!(!debug_output.contains("hunter2"));
    }
}
