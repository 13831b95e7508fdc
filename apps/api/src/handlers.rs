pub mod audit;
pub mod catalog;
pub mod editor;
pub mod health;
