pub mod generate;
pub mod redirect_target;
