use std::fmt;

/// Longest name the entry field accepts
pub const MAX_NAME_LEN: usize = 20;

/// A validated, trimmed player name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim `raw` and reject it if nothing is left
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err("Please enter a name".to_string());
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(format!("Name must be at most {} characters", MAX_NAME_LEN));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text typed into the name field so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameInput {
    buffer: String,
}

impl NameInput {
    /// Append a character; control characters and overflow are dropped
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.buffer.chars().count() >= MAX_NAME_LEN {
            return false;
        }
        self.buffer.push(c);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.buffer.pop()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn set(&mut self, text: &str) {
        self.buffer = text.chars().filter(|c| !c.is_control()).take(MAX_NAME_LEN).collect();
    }
}
