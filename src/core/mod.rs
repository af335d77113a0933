pub mod grammar;
pub mod renderer;
pub mod shuffle;
pub mod substitute;
