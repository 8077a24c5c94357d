// src/domain/user/entity.rs
use crate::domain::user::value_objects::{UserId, UserLogin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: UserLogin,
    pub name: Option<String>,
}

