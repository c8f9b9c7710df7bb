use uuid::Uuid;

use kernel::prelude::entity::{DestructUser, User};

#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            id, name, email, ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct CredentialDto {
    pub email: String,
    pub password: String,
}
