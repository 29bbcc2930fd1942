//! Teams domain layer: entities, errors, validation, tokens, phone numbers

pub mod entities;
pub mod error;
pub mod phone;
pub mod token;
pub mod validation;
