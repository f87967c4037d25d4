pub mod calendar;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod entitlement;
pub mod grocery;
pub mod journal;
pub mod matcher;
pub mod mealdb;
pub mod pantry;
pub mod recipe;
pub mod store;
