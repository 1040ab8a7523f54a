pub mod cred_def;
pub mod credential;
pub mod did;
pub mod schema;
pub mod status;
