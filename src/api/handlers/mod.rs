pub mod balance;
pub mod contract;
pub mod health;
pub mod token;
pub mod top;
