//! Domain types for the hero catalogue

mod hero;
mod list;

pub use hero::{Hero, HeroChanges, HeroField, HeroStory, NewHero, MAX_TEXT_LEN};
pub use list::{ListRequest, SortDirection};
