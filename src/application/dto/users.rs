use crate::domain::user::User;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            login: user.login.into(),
            name: user.name,
        }
    }
}
