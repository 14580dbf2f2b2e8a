mod account;
mod recipe;

pub use account::{Account, NewAccount};
pub use recipe::Recipe;
