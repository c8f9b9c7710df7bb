use serde::Deserialize;

use application::transfer::{CreateUserDto, CredentialDto};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct CredentialRequest {
    email: String,
    password: String,
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateUserDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateUserDto {
            name: input.name,
            email: input.email,
            password: input.password,
        }
    }
}

impl Intake<CredentialRequest> for Transformer {
    type To = CredentialDto;
    fn emit(&self, input: CredentialRequest) -> Self::To {
        CredentialDto {
            email: input.email,
            password: input.password,
        }
    }
}
