pub mod rule;
pub mod validator;
