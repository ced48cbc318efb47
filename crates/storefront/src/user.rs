//! Signed-in user state

/// Who is signed in, as shown on the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    pub is_authenticated: bool,
    pub username: Option<String>,
}

impl UserState {
    pub fn set_user(&mut self, username: impl Into<String>) {
        self.is_authenticated = true;
        self.username = Some(username.into());
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }
}
