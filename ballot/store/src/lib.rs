mod error;
mod perturbation;
mod seeder;
mod storage;
mod store;

pub use {error::*, perturbation::*, seeder::*, storage::*, store::*};
