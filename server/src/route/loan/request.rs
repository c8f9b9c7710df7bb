use serde::Deserialize;

use application::transfer::{CredentialDto, LendingDto};

use crate::controller::Intake;

#[derive(Deserialize)]
pub struct LendingRequest {
    email: String,
    password: String,
    title: String,
    author: String,
}

pub struct Transformer;

impl Intake<LendingRequest> for Transformer {
    type To = LendingDto;
    fn emit(&self, input: LendingRequest) -> Self::To {
        LendingDto {
            credential: CredentialDto {
                email: input.email,
                password: input.password,
            },
            title: input.title,
            author: input.author,
        }
    }
}
