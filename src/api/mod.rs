pub mod company;
pub mod health;
