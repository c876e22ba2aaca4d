pub mod build;
pub mod dependents;
pub mod edit;
pub mod list;
pub mod run;
pub mod validate;
