// Domain layer - Session model, trim rules and filter mapping

pub mod errors;
pub mod model;
pub mod rules;
